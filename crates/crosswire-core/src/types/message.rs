//! Messages and the endpoints they travel between.

use crate::schema::EndpointType;
use crate::types::MessageContent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Create a message ID from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random message ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A typed address at one end of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageEndpoint {
    /// What kind of address this is.
    pub endpoint_type: EndpointType,
    /// The address itself: a phone number, email address, device token, etc.
    pub address: String,
}

impl MessageEndpoint {
    /// Create an endpoint of the given type.
    pub fn new(endpoint_type: EndpointType, address: impl Into<String>) -> Self {
        Self {
            endpoint_type,
            address: address.into(),
        }
    }

    /// A phone-number endpoint.
    pub fn phone(number: impl Into<String>) -> Self {
        Self::new(EndpointType::PhoneNumber, number)
    }

    /// An email-address endpoint.
    pub fn email(address: impl Into<String>) -> Self {
        Self::new(EndpointType::EmailAddress, address)
    }

    /// A URL endpoint.
    pub fn url(url: impl Into<String>) -> Self {
        Self::new(EndpointType::Url, url)
    }

    /// A device-token endpoint.
    pub fn device(token: impl Into<String>) -> Self {
        Self::new(EndpointType::DeviceId, token)
    }

    /// A provider-scoped user endpoint.
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(EndpointType::UserId, id)
    }

    /// A publish/subscribe topic endpoint.
    pub fn topic(name: impl Into<String>) -> Self {
        Self::new(EndpointType::Topic, name)
    }
}

impl fmt::Display for MessageEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.endpoint_type, self.address)
    }
}

/// A message travelling through a channel.
///
/// Properties are free-form JSON values keyed by name. Unlike connection
/// settings, they are validated strictly: a schema rejects any property
/// it does not declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,

    /// Originating endpoint, when the caller supplies one. Some channels
    /// take the sender from connection settings instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<MessageEndpoint>,

    /// Destination endpoint.
    pub receiver: MessageEndpoint,

    /// The message body.
    pub content: MessageContent,

    /// Channel-specific per-message options.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Value>,

    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message to `receiver` with the given content. A fresh ID
    /// and the current time are assigned.
    pub fn new(receiver: MessageEndpoint, content: MessageContent) -> Self {
        Self {
            id: MessageId::generate(),
            sender: None,
            receiver,
            content,
            properties: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// A plain-text message to `receiver`.
    pub fn text(receiver: MessageEndpoint, body: impl Into<String>) -> Self {
        Self::new(receiver, MessageContent::text(body))
    }

    /// Set the originating endpoint.
    pub fn with_sender(mut self, sender: MessageEndpoint) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Replace the generated ID.
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a per-message property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
