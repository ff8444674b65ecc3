//! Connector layer for Crosswire.
//!
//! This crate turns schemas from `crosswire-core` into enforced runtime
//! behavior: the [`Connector`] traits provider integrations implement,
//! the [`GatedConnector`] wrapper that validates and capability-checks
//! every operation, and the [`ConnectorRegistry`] that ties channel
//! identities to schemas and factories.

pub mod error;
pub mod host;
pub mod memory;
pub mod registry;
pub mod traits;

pub use error::ConnectorError;
pub use host::GatedConnector;
pub use memory::{MemoryConnector, MemoryConnectorFactory};
pub use registry::ConnectorRegistry;
pub use traits::{
    ConnectionHealth, Connector, ConnectorFactory, DeliveryReceipt, HealthStatus,
};

/// Result type for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
