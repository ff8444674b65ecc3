//! Endpoint declarations: the address kinds a channel exchanges messages with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of address a message endpoint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// E.164 or local phone number.
    PhoneNumber,
    /// Email address.
    EmailAddress,
    /// Callback or webhook URL.
    Url,
    /// Push-notification device token.
    DeviceId,
    /// Provider-scoped user identifier.
    UserId,
    /// Publish/subscribe topic name.
    Topic,
}

impl EndpointType {
    /// Endpoint type name as it appears in validation messages.
    pub const fn name(self) -> &'static str {
        match self {
            EndpointType::PhoneNumber => "PhoneNumber",
            EndpointType::EmailAddress => "EmailAddress",
            EndpointType::Url => "Url",
            EndpointType::DeviceId => "DeviceId",
            EndpointType::UserId => "UserId",
            EndpointType::Topic => "Topic",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares that a channel exchanges messages with one endpoint type,
/// and in which directions.
///
/// `can_send` means an address of this type may originate messages;
/// `can_receive` means it may be a message destination. A declaration
/// with neither direction is rejected when the schema is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDeclaration {
    /// The endpoint type being declared.
    pub endpoint_type: EndpointType,

    /// Addresses of this type may appear as a message's sender.
    #[serde(default)]
    pub can_send: bool,

    /// Addresses of this type may appear as a message's receiver.
    #[serde(default)]
    pub can_receive: bool,

    /// A message must supply an endpoint of this type in each declared
    /// direction.
    #[serde(default)]
    pub required: bool,
}

impl EndpointDeclaration {
    /// Create a declaration with no directions enabled. Chain
    /// [`sending`](Self::sending) and [`receiving`](Self::receiving)
    /// before building the schema.
    pub fn new(endpoint_type: EndpointType) -> Self {
        Self {
            endpoint_type,
            can_send: false,
            can_receive: false,
            required: false,
        }
    }

    /// Allow addresses of this type to originate messages.
    pub fn sending(mut self) -> Self {
        self.can_send = true;
        self
    }

    /// Allow addresses of this type to be message destinations.
    pub fn receiving(mut self) -> Self {
        self.can_receive = true;
        self
    }

    /// Require every message to carry an endpoint of this type in each
    /// declared direction.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
