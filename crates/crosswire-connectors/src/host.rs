//! Schema enforcement around raw connectors.

use crate::error::ConnectorError;
use crate::traits::{ConnectionHealth, Connector, DeliveryReceipt};
use crate::Result;
use crosswire_core::{Capability, ChannelSchema, ConnectionSettings, Message};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Wraps a connector so nothing reaches it unvalidated.
///
/// Every operation is checked before the inner connector runs: settings
/// and messages must pass schema validation, each operation requires its
/// governing capability, and sends are refused until `initialize` has
/// succeeded. Connectors behind this wrapper can assume clean input.
#[derive(Debug)]
pub struct GatedConnector {
    inner: Box<dyn Connector>,
    schema: ChannelSchema,
    initialized: Arc<RwLock<bool>>,
}

impl GatedConnector {
    /// Wrap a connector, capturing its schema for enforcement.
    pub fn new(inner: Box<dyn Connector>) -> Self {
        let schema = inner.schema().clone();
        Self {
            inner,
            schema,
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// The schema being enforced.
    pub fn schema(&self) -> &ChannelSchema {
        &self.schema
    }

    /// Whether `initialize` has succeeded and no shutdown followed.
    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Validate connection settings, then initialize the inner connector.
    ///
    /// On validation failure the inner connector is never called and the
    /// error carries every failure found.
    pub async fn initialize(&self, settings: &ConnectionSettings) -> Result<()> {
        let errors = self.schema.validate_connection_settings(settings);
        if !errors.is_empty() {
            warn!(
                "Rejecting connection settings for {}: {} validation failure(s)",
                self.schema.identity(),
                errors.len()
            );
            return Err(ConnectorError::rejected(errors));
        }

        debug!(
            "Initializing connector {} with settings {:?}",
            self.schema.identity(),
            settings.redacted(&self.schema)
        );
        self.inner.initialize(settings).await?;
        *self.initialized.write().await = true;
        info!("Initialized connector: {}", self.schema.identity());
        Ok(())
    }

    /// Validate and deliver a message.
    ///
    /// Requires the `SendMessages` capability and a prior successful
    /// initialize.
    pub async fn send(&self, message: &Message) -> Result<DeliveryReceipt> {
        self.require_capability(Capability::SendMessages)?;
        if !self.is_initialized().await {
            return Err(ConnectorError::not_initialized(
                self.schema.identity().to_string(),
            ));
        }

        let errors = self.schema.validate_message(message);
        if !errors.is_empty() {
            warn!(
                "Rejecting message {} for {}: {} validation failure(s)",
                message.id,
                self.schema.identity(),
                errors.len()
            );
            return Err(ConnectorError::rejected(errors));
        }

        let receipt = self.inner.send(message).await?;
        debug!(
            "Delivered message {} via {}",
            receipt.message_id,
            self.schema.identity()
        );
        Ok(receipt)
    }

    /// Probe the provider connection. Requires the `HealthCheck`
    /// capability and a prior successful initialize.
    pub async fn test_connection(&self) -> Result<ConnectionHealth> {
        self.require_capability(Capability::HealthCheck)?;
        if !self.is_initialized().await {
            return Err(ConnectorError::not_initialized(
                self.schema.identity().to_string(),
            ));
        }
        self.inner.test_connection().await
    }

    /// Shut the connector down and clear the initialized flag. Always
    /// permitted.
    pub async fn shutdown(&self) -> Result<()> {
        *self.initialized.write().await = false;
        info!("Shut down connector: {}", self.schema.identity());
        self.inner.shutdown().await
    }

    fn require_capability(&self, capability: Capability) -> Result<()> {
        if self.schema.has_capability(capability) {
            Ok(())
        } else {
            Err(ConnectorError::capability_not_supported(
                self.schema.identity().to_string(),
                capability,
            ))
        }
    }
}
