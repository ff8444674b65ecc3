//! Connector error types.

use crosswire_core::{Capability, SchemaError, ValidationError};
use thiserror::Error;

/// Errors that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Input was rejected by schema validation. Carries every failure
    /// found, not only the first.
    #[error("validation rejected the input: {}", format_failures(.errors))]
    Rejected {
        /// The accumulated validation failures.
        errors: Vec<ValidationError>,
    },

    /// The operation needs a capability the channel schema does not
    /// declare.
    #[error("channel '{channel}' does not support {capability}")]
    CapabilityNotSupported {
        /// The channel identity.
        channel: String,
        /// The missing capability.
        capability: Capability,
    },

    /// No schema or factory is registered under the identity.
    #[error("channel not found: {0}")]
    NotFound(String),

    /// The identity is already registered.
    #[error("channel already registered: {0}")]
    AlreadyExists(String),

    /// The connector was used before a successful initialize.
    #[error("connector '{0}' is not initialized")]
    NotInitialized(String),

    /// Authentication with the provider failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Provider-side failure.
    #[error("provider error ({channel}): {message}")]
    Provider {
        /// The channel identity.
        channel: String,
        /// Provider-reported message.
        message: String,
    },

    /// The operation timed out.
    #[error("operation timed out")]
    Timeout,

    /// Schema construction error.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ConnectorError {
    /// Create a rejection from accumulated validation failures.
    pub fn rejected(errors: Vec<ValidationError>) -> Self {
        Self::Rejected { errors }
    }

    /// Create a missing-capability error.
    pub fn capability_not_supported(channel: impl Into<String>, capability: Capability) -> Self {
        Self::CapabilityNotSupported {
            channel: channel.into(),
            capability,
        }
    }

    /// Create a not-found error.
    pub fn not_found(identity: impl Into<String>) -> Self {
        Self::NotFound(identity.into())
    }

    /// Create an already-registered error.
    pub fn already_exists(identity: impl Into<String>) -> Self {
        Self::AlreadyExists(identity.into())
    }

    /// Create a not-initialized error.
    pub fn not_initialized(identity: impl Into<String>) -> Self {
        Self::NotInitialized(identity.into())
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a provider-side error.
    pub fn provider(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// The validation failures behind a rejection, empty for other
    /// variants.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Rejected { errors } => errors,
            _ => &[],
        }
    }

    /// Whether retrying the operation could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Provider { .. })
    }
}

fn format_failures(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_lists_every_failure() {
        let err = ConnectorError::rejected(vec![
            ValidationError::new("Required parameter 'account_sid' is missing"),
            ValidationError::new("Required parameter 'auth_token' is missing"),
        ]);
        assert_eq!(err.validation_errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "validation rejected the input: Required parameter 'account_sid' is missing; \
             Required parameter 'auth_token' is missing"
        );
    }

    #[test]
    fn test_capability_error_names_channel_and_capability() {
        let err =
            ConnectorError::capability_not_supported("twilio/sms@1.0.0", Capability::Templates);
        assert_eq!(
            err.to_string(),
            "channel 'twilio/sms@1.0.0' does not support Templates"
        );
    }

    #[test]
    fn test_is_retriable() {
        assert!(ConnectorError::Timeout.is_retriable());
        assert!(ConnectorError::provider("twilio/sms@1.0.0", "500").is_retriable());
        assert!(!ConnectorError::auth("bad token").is_retriable());
        assert!(!ConnectorError::rejected(Vec::new()).is_retriable());
    }
}
