//! Channel schema declarations and their construction.

mod channel;
mod endpoint;
mod parameter;
mod restriction;

pub use channel::{ChannelIdentity, ChannelSchema, SchemaBuilder};
pub use endpoint::{EndpointDeclaration, EndpointType};
pub use parameter::{ParameterDescriptor, ParameterType};
