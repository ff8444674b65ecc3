//! Core data types shared across the workspace.

mod auth;
mod content;
mod message;
mod settings;

pub use auth::AuthenticationType;
pub use content::{MessageContent, MessageContentType};
pub use message::{Message, MessageEndpoint, MessageId};
pub use settings::ConnectionSettings;
