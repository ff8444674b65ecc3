//! Core connector traits.

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crosswire_core::{ChannelSchema, ConnectionSettings, Message, MessageId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

/// A live connection to one provider channel.
///
/// Implementations handle provider I/O only. Schema validation and
/// capability gating happen in [`GatedConnector`](crate::host::GatedConnector),
/// which wraps every connector the registry opens, so a connector can
/// assume its inputs already passed validation.
#[async_trait]
pub trait Connector: Send + Sync + Debug {
    /// The schema this connector implements.
    fn schema(&self) -> &ChannelSchema;

    /// Establish the provider connection using validated settings.
    async fn initialize(&self, settings: &ConnectionSettings) -> Result<()>;

    /// Probe the provider connection.
    async fn test_connection(&self) -> Result<ConnectionHealth>;

    /// Deliver a message.
    async fn send(&self, message: &Message) -> Result<DeliveryReceipt>;

    /// Release the provider connection.
    async fn shutdown(&self) -> Result<()>;
}

/// Result of a connection probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionHealth {
    /// Health status.
    pub status: HealthStatus,

    /// Probe round-trip latency in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// Error message if unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionHealth {
    /// A healthy report.
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            latency_ms: None,
            error: None,
        }
    }

    /// A degraded report with the reason.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            latency_ms: None,
            error: Some(reason.into()),
        }
    }

    /// An unhealthy report with the reason.
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            error: Some(reason.into()),
        }
    }

    /// Attach the probe latency.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Whether the status is `Healthy`.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

impl Default for ConnectionHealth {
    fn default() -> Self {
        Self {
            status: HealthStatus::Unknown,
            latency_ms: None,
            error: None,
        }
    }
}

/// Health status reported by a connection probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The connection is healthy.
    Healthy,

    /// The connection works but with reduced service.
    Degraded,

    /// The connection is down.
    Unhealthy,

    /// No probe has run yet.
    #[default]
    Unknown,
}

/// Result of a successful send.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// The message that was delivered.
    pub message_id: MessageId,

    /// Identifier assigned by the provider, when one is returned.
    pub provider_message_id: Option<String>,

    /// When the connector accepted the message.
    pub timestamp: DateTime<Utc>,

    /// Additional provider metadata.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl DeliveryReceipt {
    /// Create a receipt for the given message.
    pub fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            provider_message_id: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Attach the provider-assigned identifier.
    pub fn with_provider_id(mut self, id: impl Into<String>) -> Self {
        self.provider_message_id = Some(id.into());
        self
    }

    /// Attach provider metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Factory for creating connector instances.
#[async_trait]
pub trait ConnectorFactory: Send + Sync {
    /// The schema of the connectors this factory creates.
    fn schema(&self) -> &ChannelSchema;

    /// Create an uninitialized connector instance.
    async fn create(&self) -> Result<Box<dyn Connector>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_receipt_builder() {
        let receipt = DeliveryReceipt::new(MessageId::new("msg-1"))
            .with_provider_id("SM123")
            .with_metadata("segments", serde_json::json!(2));

        assert_eq!(receipt.message_id.as_str(), "msg-1");
        assert_eq!(receipt.provider_message_id.as_deref(), Some("SM123"));
        assert_eq!(receipt.metadata["segments"], serde_json::json!(2));
    }

    #[test]
    fn test_connection_health_reports() {
        assert_eq!(ConnectionHealth::default().status, HealthStatus::Unknown);

        let healthy = ConnectionHealth::healthy().with_latency(12);
        assert!(healthy.is_healthy());
        assert_eq!(
            serde_json::to_value(&healthy).unwrap(),
            serde_json::json!({"status": "healthy", "latency_ms": 12})
        );

        let down = ConnectionHealth::unhealthy("socket refused");
        assert!(!down.is_healthy());
        assert_eq!(down.error.as_deref(), Some("socket refused"));
    }
}
