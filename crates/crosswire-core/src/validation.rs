//! Validation of connection settings and messages against a channel schema.
//!
//! Validation never fails fast: every check runs and every failure is
//! reported, so a caller can fix an entire configuration in one pass. An
//! empty result means the input is valid.

use crate::schema::ChannelSchema;
use crate::types::{ConnectionSettings, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A single validation failure.
///
/// Carries a human-readable message and, where one applies, the name of
/// the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl ValidationError {
    /// A failure not tied to any one field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    /// A failure tied to a named field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending field, if the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

fn value_present(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

impl ChannelSchema {
    /// Check supplied connection settings against the declared parameters.
    ///
    /// Reports missing required parameters (including the designated Basic
    /// authentication credentials), then type mismatches and allowed-set
    /// violations for the values that were supplied. Settings keys the
    /// schema does not declare are tolerated; provider SDKs routinely read
    /// extras of their own. Contrast with
    /// [`validate_message_properties`](Self::validate_message_properties),
    /// which rejects unknown names.
    pub fn validate_connection_settings(&self, settings: &ConnectionSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for descriptor in self.parameters() {
            let required = descriptor.required || self.is_basic_credential(&descriptor.name);
            if required && !settings.is_present(&descriptor.name) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!("Required parameter '{}' is missing", descriptor.name),
                ));
            }
        }

        for descriptor in self.parameters() {
            let value = match settings.get(&descriptor.name) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            if !descriptor.parameter_type.accepts(value) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "Parameter '{}' has an incompatible type (expected {})",
                        descriptor.name, descriptor.parameter_type
                    ),
                ));
            } else if !descriptor.value_allowed(value) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "Parameter '{}' has a value not in its allowed set",
                        descriptor.name
                    ),
                ));
            }
        }

        errors
    }

    /// Check per-message properties against the declared descriptors.
    ///
    /// Unlike connection settings, properties are closed: any name the
    /// schema does not declare is a failure. Unknown-property failures are
    /// reported last, sorted by name so the output is deterministic.
    pub fn validate_message_properties(
        &self,
        properties: &HashMap<String, Value>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for descriptor in self.message_properties() {
            if descriptor.required && !value_present(properties.get(&descriptor.name)) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "Required message property '{}' is missing",
                        descriptor.name
                    ),
                ));
            }
        }

        for descriptor in self.message_properties() {
            let value = match properties.get(&descriptor.name) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            if !descriptor.parameter_type.accepts(value) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "Message property '{}' has an incompatible type (expected {})",
                        descriptor.name, descriptor.parameter_type
                    ),
                ));
            } else if !descriptor.value_allowed(value) {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "Message property '{}' has a value not in its allowed set",
                        descriptor.name
                    ),
                ));
            }
        }

        let mut unknown: Vec<&str> = properties
            .keys()
            .filter(|name| self.message_property(name).is_none())
            .map(String::as_str)
            .collect();
        unknown.sort_unstable();
        for name in unknown {
            errors.push(ValidationError::for_field(
                name,
                format!("Unknown message property '{name}'"),
            ));
        }

        errors
    }

    /// Check a whole message: content types, endpoints, then properties.
    pub fn validate_message(&self, message: &Message) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for content_type in message.content.content_types() {
            if !self.supports_content_type(content_type) {
                errors.push(ValidationError::for_field(
                    "content",
                    format!("Content type '{content_type}' is not supported"),
                ));
            }
        }

        let receiver_type = message.receiver.endpoint_type;
        match self.endpoint(receiver_type) {
            None => errors.push(ValidationError::for_field(
                "receiver",
                format!("Endpoint type '{receiver_type}' is not declared by this channel"),
            )),
            Some(declaration) if !declaration.can_receive => {
                errors.push(ValidationError::for_field(
                    "receiver",
                    format!(
                        "Endpoint type '{receiver_type}' cannot be a message destination on this channel"
                    ),
                ));
            }
            _ => {}
        }

        if let Some(sender) = &message.sender {
            let sender_type = sender.endpoint_type;
            match self.endpoint(sender_type) {
                None => errors.push(ValidationError::for_field(
                    "sender",
                    format!("Endpoint type '{sender_type}' is not declared by this channel"),
                )),
                Some(declaration) if !declaration.can_send => {
                    errors.push(ValidationError::for_field(
                        "sender",
                        format!(
                            "Endpoint type '{sender_type}' cannot originate messages on this channel"
                        ),
                    ));
                }
                _ => {}
            }
        }

        for declaration in self.endpoints() {
            if !declaration.required {
                continue;
            }
            let endpoint_type = declaration.endpoint_type;
            if declaration.can_receive && receiver_type != endpoint_type {
                errors.push(ValidationError::for_field(
                    "receiver",
                    format!("Message is missing a required '{endpoint_type}' receiver endpoint"),
                ));
            }
            if declaration.can_send
                && message
                    .sender
                    .as_ref()
                    .map(|s| s.endpoint_type != endpoint_type)
                    .unwrap_or(true)
            {
                errors.push(ValidationError::for_field(
                    "sender",
                    format!("Message is missing a required '{endpoint_type}' sender endpoint"),
                ));
            }
        }

        errors.extend(self.validate_message_properties(&message.properties));
        errors
    }

    fn is_basic_credential(&self, name: &str) -> bool {
        match self.basic_credentials() {
            Some((id, secret)) => name == id || name == secret,
            None => false,
        }
    }
}
