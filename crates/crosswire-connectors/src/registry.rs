//! Registry of channel schemas and connector factories.

use crate::error::ConnectorError;
use crate::host::GatedConnector;
use crate::traits::ConnectorFactory;
use crate::Result;
use crosswire_core::{ChannelIdentity, ChannelSchema, ConnectionSettings};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Registry tying channel identities to schemas and connector factories.
///
/// Schemas registered as restrictions are checked against their base
/// before they are accepted, so everything in the registry upholds the
/// narrowing guarantee.
pub struct ConnectorRegistry {
    schemas: RwLock<HashMap<ChannelIdentity, ChannelSchema>>,
    factories: RwLock<HashMap<ChannelIdentity, Arc<dyn ConnectorFactory>>>,
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register a schema. Fails if the identity is already taken.
    pub async fn register_schema(&self, schema: ChannelSchema) -> Result<()> {
        let mut schemas = self.schemas.write().await;
        let identity = schema.identity().clone();
        if schemas.contains_key(&identity) {
            return Err(ConnectorError::already_exists(identity.to_string()));
        }
        info!("Registered channel schema: {}", identity);
        schemas.insert(identity, schema);
        Ok(())
    }

    /// Register a derived schema after checking it narrows `base`.
    ///
    /// The base must already be registered. Any widening is rejected with
    /// the full list of violations.
    pub async fn register_restriction(
        &self,
        schema: ChannelSchema,
        base: &ChannelIdentity,
    ) -> Result<()> {
        let base_schema = self
            .schema(base)
            .await
            .ok_or_else(|| ConnectorError::not_found(base.to_string()))?;
        let errors = schema.validate_as_restriction_of(&base_schema);
        if !errors.is_empty() {
            return Err(ConnectorError::rejected(errors));
        }
        debug!(
            "Schema {} accepted as a restriction of {}",
            schema.identity(),
            base
        );
        self.register_schema(schema).await
    }

    /// Register a connector factory. The factory's schema is registered
    /// too when its identity is new.
    pub async fn register_factory(&self, factory: Arc<dyn ConnectorFactory>) -> Result<()> {
        let identity = factory.schema().identity().clone();
        {
            let mut factories = self.factories.write().await;
            if factories.contains_key(&identity) {
                return Err(ConnectorError::already_exists(identity.to_string()));
            }
            factories.insert(identity.clone(), factory.clone());
        }

        let mut schemas = self.schemas.write().await;
        if !schemas.contains_key(&identity) {
            schemas.insert(identity.clone(), factory.schema().clone());
        }
        info!("Registered connector factory: {}", identity);
        Ok(())
    }

    /// The schema registered under `identity`, if any.
    pub async fn schema(&self, identity: &ChannelIdentity) -> Option<ChannelSchema> {
        let schemas = self.schemas.read().await;
        schemas.get(identity).cloned()
    }

    /// All registered identities, sorted.
    pub async fn list(&self) -> Vec<ChannelIdentity> {
        let schemas = self.schemas.read().await;
        let mut identities: Vec<ChannelIdentity> = schemas.keys().cloned().collect();
        identities.sort();
        identities
    }

    /// All schemas registered for one provider.
    pub async fn schemas_for_provider(&self, provider: &str) -> Vec<ChannelSchema> {
        let schemas = self.schemas.read().await;
        let mut matching: Vec<ChannelSchema> = schemas
            .values()
            .filter(|s| s.provider() == provider)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.identity().cmp(b.identity()));
        matching
    }

    /// Number of registered schemas.
    pub async fn count(&self) -> usize {
        let schemas = self.schemas.read().await;
        schemas.len()
    }

    /// Create, gate, and initialize a connector for `identity`.
    ///
    /// The settings are validated against the schema before the connector
    /// touches them; a rejection carries every failure found.
    pub async fn open(
        &self,
        identity: &ChannelIdentity,
        settings: &ConnectionSettings,
    ) -> Result<GatedConnector> {
        let factory = {
            let factories = self.factories.read().await;
            factories.get(identity).cloned()
        }
        .ok_or_else(|| ConnectorError::not_found(identity.to_string()))?;

        let connector = factory.create().await?;
        let gated = GatedConnector::new(connector);
        gated.initialize(settings).await?;
        debug!("Opened connector: {}", identity);
        Ok(gated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryConnector, MemoryConnectorFactory};
    use crosswire_core::{Capability, MessageContentType};

    fn loopback_identity() -> ChannelIdentity {
        ChannelIdentity::parse("memory", "loopback", "1.0.0").unwrap()
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let registry = ConnectorRegistry::new();
        assert_eq!(registry.count().await, 0);
        assert!(registry.list().await.is_empty());
        assert!(registry.schema(&loopback_identity()).await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_schema_is_rejected() {
        let registry = ConnectorRegistry::new();
        let schema = MemoryConnector::default_schema();
        registry.register_schema(schema.clone()).await.unwrap();

        let err = registry.register_schema(schema).await.unwrap_err();
        assert!(matches!(err, ConnectorError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_register_restriction_enforces_narrowing() {
        let registry = ConnectorRegistry::new();
        let base = MemoryConnector::default_schema();
        registry.register_schema(base.clone()).await.unwrap();

        let narrowed = base
            .restrict("1.1.0")
            .without_capability(Capability::ReceiveMessages)
            .without_content_type(MessageContentType::Html)
            .build()
            .unwrap();
        registry
            .register_restriction(narrowed, base.identity())
            .await
            .unwrap();

        let widened = base
            .restrict("1.2.0")
            .capability(Capability::BulkMessaging)
            .build()
            .unwrap();
        let err = registry
            .register_restriction(widened, base.identity())
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].message(),
            "Capability 'BulkMessaging' is not granted by the base schema"
        );
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_restriction_requires_registered_base() {
        let registry = ConnectorRegistry::new();
        let base = MemoryConnector::default_schema();
        let narrowed = base.restrict("1.1.0").build().unwrap();

        let err = registry
            .register_restriction(narrowed, base.identity())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_register_factory_registers_schema() {
        let registry = ConnectorRegistry::new();
        let factory = Arc::new(MemoryConnectorFactory::new());
        registry.register_factory(factory).await.unwrap();

        assert!(registry.schema(&loopback_identity()).await.is_some());
        assert_eq!(registry.list().await, vec![loopback_identity()]);
    }

    #[tokio::test]
    async fn test_open_unknown_identity_fails() {
        let registry = ConnectorRegistry::new();
        let err = registry
            .open(&loopback_identity(), &ConnectionSettings::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_validates_settings() {
        let registry = ConnectorRegistry::new();
        registry
            .register_factory(Arc::new(MemoryConnectorFactory::new()))
            .await
            .unwrap();

        let err = registry
            .open(&loopback_identity(), &ConnectionSettings::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].message(),
            "Required parameter 'namespace' is missing"
        );

        let settings = ConnectionSettings::new().with_value("namespace", "test");
        let gated = registry.open(&loopback_identity(), &settings).await.unwrap();
        assert!(gated.is_initialized().await);
    }

    #[tokio::test]
    async fn test_schemas_for_provider() {
        let registry = ConnectorRegistry::new();
        let base = MemoryConnector::default_schema();
        registry.register_schema(base.clone()).await.unwrap();
        registry
            .register_schema(base.restrict("2.0.0").build().unwrap())
            .await
            .unwrap();

        let memory_schemas = registry.schemas_for_provider("memory").await;
        assert_eq!(memory_schemas.len(), 2);
        assert!(registry.schemas_for_provider("twilio").await.is_empty());
    }
}
