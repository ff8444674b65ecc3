//! Authentication mechanisms a channel may accept.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a connector proves its identity to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// Identifier/secret pair carried in two designated connection
    /// parameters.
    Basic,
    /// Opaque bearer token.
    Token,
    /// Static API key.
    ApiKey,
    /// OAuth 2.0 access token flow.
    #[serde(rename = "oauth2")]
    OAuth2,
}

impl AuthenticationType {
    /// Authentication type name as it appears in validation messages.
    pub const fn name(self) -> &'static str {
        match self {
            AuthenticationType::Basic => "Basic",
            AuthenticationType::Token => "Token",
            AuthenticationType::ApiKey => "ApiKey",
            AuthenticationType::OAuth2 => "OAuth2",
        }
    }
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&AuthenticationType::ApiKey).unwrap(),
            "\"api_key\""
        );
        assert_eq!(
            serde_json::to_string(&AuthenticationType::OAuth2).unwrap(),
            "\"oauth2\""
        );
        let parsed: AuthenticationType = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(parsed, AuthenticationType::Basic);
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthenticationType::OAuth2.to_string(), "OAuth2");
    }
}
