//! # crosswire-core
//!
//! Channel schemas and the capability-validation engine for Crosswire.
//!
//! This crate is the declaration layer the rest of the workspace builds
//! on:
//!
//! - **Schemas**: immutable, per-provider channel declarations covering
//!   capabilities, content types, connection parameters, message
//!   properties, endpoints, and authentication
//! - **Validation**: checking connection settings and outgoing messages
//!   against a schema before any provider call is made, accumulating
//!   every failure instead of stopping at the first
//! - **Restrictions**: verifying that a derived schema variant only
//!   narrows its base, never widens it

pub mod capability;
pub mod error;
pub mod schema;
pub mod types;
pub mod validation;

pub use capability::{Capability, CapabilitySet};
pub use error::{Result, SchemaError};
pub use schema::{
    ChannelIdentity, ChannelSchema, EndpointDeclaration, EndpointType, ParameterDescriptor,
    ParameterType, SchemaBuilder,
};
pub use types::{
    AuthenticationType, ConnectionSettings, Message, MessageContent, MessageContentType,
    MessageEndpoint, MessageId,
};
pub use validation::ValidationError;
