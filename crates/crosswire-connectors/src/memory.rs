//! In-memory loopback connector.
//!
//! Stores delivered messages instead of calling a provider. Used by the
//! integration tests and as the reference connector implementation.

use crate::error::ConnectorError;
use crate::traits::{ConnectionHealth, Connector, ConnectorFactory, DeliveryReceipt};
use crate::Result;
use async_trait::async_trait;
use crosswire_core::{
    Capability, ChannelSchema, ConnectionSettings, EndpointDeclaration, EndpointType, Message,
    MessageContentType, ParameterDescriptor,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Connector that keeps delivered messages in memory.
///
/// Clones share their state, so a test can hold one handle, pass a clone
/// into a [`GatedConnector`](crate::host::GatedConnector), and observe
/// what was delivered.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    schema: ChannelSchema,
    connected: Arc<RwLock<bool>>,
    delivered: Arc<RwLock<Vec<Message>>>,
    outage: Arc<RwLock<Option<String>>>,
}

impl MemoryConnector {
    /// Create a loopback connector implementing `schema`.
    pub fn new(schema: ChannelSchema) -> Self {
        Self {
            schema,
            connected: Arc::new(RwLock::new(false)),
            delivered: Arc::new(RwLock::new(Vec::new())),
            outage: Arc::new(RwLock::new(None)),
        }
    }

    /// The stock loopback schema: plain-text and HTML messages between
    /// user endpoints, with send, receive, and health-check support.
    pub fn default_schema() -> ChannelSchema {
        ChannelSchema::builder("memory", "loopback", "1.0.0")
            .display_name("In-Memory Loopback")
            .capabilities(
                Capability::SendMessages | Capability::ReceiveMessages | Capability::HealthCheck,
            )
            .content_type(MessageContentType::PlainText)
            .content_type(MessageContentType::Html)
            .parameter(ParameterDescriptor::string("namespace").required())
            .parameter(ParameterDescriptor::integer("capacity").with_default(256))
            .endpoint(
                EndpointDeclaration::new(EndpointType::UserId)
                    .sending()
                    .receiving(),
            )
            .build()
            .expect("loopback schema is valid")
    }

    /// Messages delivered so far, oldest first.
    pub async fn delivered(&self) -> Vec<Message> {
        self.delivered.read().await.clone()
    }

    /// Drop all delivered messages.
    pub async fn clear(&self) {
        self.delivered.write().await.clear();
    }

    /// Simulate a provider outage. Until [`clear_outage`](Self::clear_outage)
    /// is called, sends fail with a provider error and probes report the
    /// connection as unhealthy.
    pub async fn set_outage(&self, reason: impl Into<String>) {
        *self.outage.write().await = Some(reason.into());
    }

    /// End a simulated outage.
    pub async fn clear_outage(&self) {
        *self.outage.write().await = None;
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    fn schema(&self) -> &ChannelSchema {
        &self.schema
    }

    async fn initialize(&self, _settings: &ConnectionSettings) -> Result<()> {
        *self.connected.write().await = true;
        Ok(())
    }

    async fn test_connection(&self) -> Result<ConnectionHealth> {
        if !*self.connected.read().await {
            return Ok(ConnectionHealth::unhealthy("not connected"));
        }
        Ok(match self.outage.read().await.as_deref() {
            Some(reason) => ConnectionHealth::unhealthy(reason),
            None => ConnectionHealth::healthy().with_latency(0),
        })
    }

    async fn send(&self, message: &Message) -> Result<DeliveryReceipt> {
        if !*self.connected.read().await {
            return Err(ConnectorError::not_initialized(
                self.schema.identity().to_string(),
            ));
        }
        if let Some(reason) = self.outage.read().await.as_deref() {
            return Err(ConnectorError::provider(
                self.schema.identity().to_string(),
                reason,
            ));
        }
        let mut delivered = self.delivered.write().await;
        delivered.push(message.clone());
        Ok(DeliveryReceipt::new(message.id.clone())
            .with_provider_id(format!("mem-{}", delivered.len())))
    }

    async fn shutdown(&self) -> Result<()> {
        *self.connected.write().await = false;
        Ok(())
    }
}

/// Factory producing loopback connectors.
///
/// Every connector the factory creates shares one message store, so
/// deliveries made through the registry stay observable.
pub struct MemoryConnectorFactory {
    prototype: MemoryConnector,
}

impl MemoryConnectorFactory {
    /// A factory for the stock loopback schema.
    pub fn new() -> Self {
        Self::with_schema(MemoryConnector::default_schema())
    }

    /// A factory for a custom schema.
    pub fn with_schema(schema: ChannelSchema) -> Self {
        Self {
            prototype: MemoryConnector::new(schema),
        }
    }

    /// A handle sharing state with every connector this factory creates.
    pub fn connector(&self) -> MemoryConnector {
        self.prototype.clone()
    }
}

impl Default for MemoryConnectorFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectorFactory for MemoryConnectorFactory {
    fn schema(&self) -> &ChannelSchema {
        self.prototype.schema()
    }

    async fn create(&self) -> Result<Box<dyn Connector>> {
        Ok(Box::new(self.prototype.clone()))
    }
}
