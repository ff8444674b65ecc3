//! The channel schema aggregate and its builder.

use crate::capability::{Capability, CapabilitySet};
use crate::error::{Result, SchemaError};
use crate::schema::{EndpointDeclaration, EndpointType, ParameterDescriptor};
use crate::types::{AuthenticationType, MessageContentType};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of a channel schema: provider, channel type, and version.
///
/// Two schemas describe the same channel when provider and channel type
/// match; the version distinguishes derived variants of that channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelIdentity {
    /// Provider name, e.g. `twilio`.
    pub provider: String,
    /// Channel type within the provider, e.g. `sms`.
    pub channel_type: String,
    /// Schema version.
    pub version: Version,
}

impl ChannelIdentity {
    /// Create an identity from its parts.
    pub fn new(provider: impl Into<String>, channel_type: impl Into<String>, version: Version) -> Self {
        Self {
            provider: provider.into(),
            channel_type: channel_type.into(),
            version,
        }
    }

    /// Create an identity, parsing the version from a string.
    pub fn parse(
        provider: impl Into<String>,
        channel_type: impl Into<String>,
        version: &str,
    ) -> Result<Self> {
        let parsed = version
            .parse::<Version>()
            .map_err(|e| SchemaError::version(version, e))?;
        Ok(Self::new(provider, channel_type, parsed))
    }
}

impl fmt::Display for ChannelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.provider, self.channel_type, self.version)
    }
}

/// Declares what a provider channel supports and how it must be configured.
///
/// A schema is immutable once built. Construction goes through
/// [`ChannelSchema::builder`], which checks the definition for internal
/// consistency and reports every defect it finds at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSchema {
    identity: ChannelIdentity,
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    capabilities: CapabilitySet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    content_types: Vec<MessageContentType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    message_properties: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    endpoints: Vec<EndpointDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    authentication_types: Vec<AuthenticationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_credentials: Option<(String, String)>,
}

impl ChannelSchema {
    /// Start building a schema for `provider`/`channel_type` at `version`.
    /// The version string is parsed when [`SchemaBuilder::build`] runs.
    pub fn builder(
        provider: impl Into<String>,
        channel_type: impl Into<String>,
        version: impl Into<String>,
    ) -> SchemaBuilder {
        SchemaBuilder {
            provider: provider.into(),
            channel_type: channel_type.into(),
            version: version.into(),
            display_name: None,
            description: None,
            capabilities: CapabilitySet::EMPTY,
            content_types: Vec::new(),
            parameters: Vec::new(),
            message_properties: Vec::new(),
            endpoints: Vec::new(),
            authentication_types: Vec::new(),
            basic_credentials: None,
            require_parameters: Vec::new(),
        }
    }

    /// Start building a derived variant of this schema at a new version.
    ///
    /// The builder starts as a full copy; chain the `without_*` and
    /// `require_parameter` methods to narrow it. Whether the result
    /// actually narrows this schema is checked separately by
    /// [`validate_as_restriction_of`](Self::validate_as_restriction_of).
    pub fn restrict(&self, version: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            provider: self.identity.provider.clone(),
            channel_type: self.identity.channel_type.clone(),
            version: version.into(),
            display_name: Some(self.display_name.clone()),
            description: self.description.clone(),
            capabilities: self.capabilities,
            content_types: self.content_types.clone(),
            parameters: self.parameters.clone(),
            message_properties: self.message_properties.clone(),
            endpoints: self.endpoints.clone(),
            authentication_types: self.authentication_types.clone(),
            basic_credentials: self.basic_credentials.clone(),
            require_parameters: Vec::new(),
        }
    }

    /// The schema's identity.
    pub fn identity(&self) -> &ChannelIdentity {
        &self.identity
    }

    /// Provider name.
    pub fn provider(&self) -> &str {
        &self.identity.provider
    }

    /// Channel type within the provider.
    pub fn channel_type(&self) -> &str {
        &self.identity.channel_type
    }

    /// Schema version.
    pub fn version(&self) -> &Version {
        &self.identity.version
    }

    /// Human-readable channel name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Optional longer description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared capability set.
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Whether the schema declares `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Supported content types.
    pub fn content_types(&self) -> &[MessageContentType] {
        &self.content_types
    }

    /// Whether `content_type` is supported.
    pub fn supports_content_type(&self, content_type: MessageContentType) -> bool {
        self.content_types.contains(&content_type)
    }

    /// Connection-parameter descriptors, in declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// The connection parameter named `name`, if declared.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Message-property descriptors, in declaration order.
    pub fn message_properties(&self) -> &[ParameterDescriptor] {
        &self.message_properties
    }

    /// The message property named `name`, if declared.
    pub fn message_property(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.message_properties.iter().find(|p| p.name == name)
    }

    /// Endpoint declarations, in declaration order.
    pub fn endpoints(&self) -> &[EndpointDeclaration] {
        &self.endpoints
    }

    /// The declaration for `endpoint_type`, if any.
    pub fn endpoint(&self, endpoint_type: EndpointType) -> Option<&EndpointDeclaration> {
        self.endpoints
            .iter()
            .find(|e| e.endpoint_type == endpoint_type)
    }

    /// Accepted authentication mechanisms.
    pub fn authentication_types(&self) -> &[AuthenticationType] {
        &self.authentication_types
    }

    /// Whether `auth_type` is accepted.
    pub fn supports_authentication(&self, auth_type: AuthenticationType) -> bool {
        self.authentication_types.contains(&auth_type)
    }

    /// The parameter names designated as the Basic authentication
    /// identifier and secret, when Basic authentication is configured.
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        self.basic_credentials
            .as_ref()
            .map(|(id, secret)| (id.as_str(), secret.as_str()))
    }

    /// Whether `other` describes the same channel: provider and channel
    /// type match, versions aside.
    pub fn is_compatible_with(&self, other: &ChannelSchema) -> bool {
        self.identity.provider == other.identity.provider
            && self.identity.channel_type == other.identity.channel_type
    }

    /// Check the definition for internal consistency.
    ///
    /// Schemas built through [`SchemaBuilder::build`] are already checked;
    /// call this on schemas that arrived through deserialization.
    pub fn validate(&self) -> Result<()> {
        let defects = self.definition_defects();
        if defects.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::invalid(defects))
        }
    }

    fn definition_defects(&self) -> Vec<String> {
        let mut defects = Vec::new();

        if self.identity.provider.trim().is_empty() {
            defects.push("channel provider must not be empty".to_string());
        }
        if self.identity.channel_type.trim().is_empty() {
            defects.push("channel type must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for descriptor in &self.parameters {
            if !seen.insert(descriptor.name.as_str()) {
                defects.push(format!("duplicate parameter '{}'", descriptor.name));
            }
            defects.extend(descriptor.defects("parameter"));
        }

        let mut seen = HashSet::new();
        for descriptor in &self.message_properties {
            if !seen.insert(descriptor.name.as_str()) {
                defects.push(format!("duplicate message property '{}'", descriptor.name));
            }
            defects.extend(descriptor.defects("message property"));
        }

        let mut seen = HashSet::new();
        for declaration in &self.endpoints {
            if !seen.insert(declaration.endpoint_type) {
                defects.push(format!(
                    "duplicate endpoint declaration for '{}'",
                    declaration.endpoint_type
                ));
            }
            if !declaration.can_send && !declaration.can_receive {
                defects.push(format!(
                    "endpoint '{}' must declare at least one direction",
                    declaration.endpoint_type
                ));
            }
        }

        if let Some((id, secret)) = &self.basic_credentials {
            if id == secret {
                defects.push(
                    "basic authentication credentials must name two distinct parameters"
                        .to_string(),
                );
            }
            for name in [id, secret] {
                if self.parameter(name).is_none() {
                    defects.push(format!(
                        "basic authentication credential '{name}' is not a declared parameter"
                    ));
                }
            }
        }

        defects
    }
}

impl fmt::Display for ChannelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}

/// Fluent builder for [`ChannelSchema`].
///
/// Every method consumes and returns the builder. [`build`](Self::build)
/// checks the whole definition and reports all defects in one error.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    provider: String,
    channel_type: String,
    version: String,
    display_name: Option<String>,
    description: Option<String>,
    capabilities: CapabilitySet,
    content_types: Vec<MessageContentType>,
    parameters: Vec<ParameterDescriptor>,
    message_properties: Vec<ParameterDescriptor>,
    endpoints: Vec<EndpointDeclaration>,
    authentication_types: Vec<AuthenticationType>,
    basic_credentials: Option<(String, String)>,
    require_parameters: Vec<String>,
}

impl SchemaBuilder {
    /// Set the human-readable channel name. Defaults to
    /// `"{provider} {channel_type}"`.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set a longer description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Declare one capability.
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities |= capability;
        self
    }

    /// Declare a set of capabilities, merged with any already declared.
    pub fn capabilities(mut self, capabilities: impl Into<CapabilitySet>) -> Self {
        self.capabilities |= capabilities.into();
        self
    }

    /// Remove a capability. Used when deriving a narrowed variant.
    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.capabilities = self.capabilities.without(capability);
        self
    }

    /// Declare a supported content type. Adding one twice is a no-op.
    pub fn content_type(mut self, content_type: MessageContentType) -> Self {
        if !self.content_types.contains(&content_type) {
            self.content_types.push(content_type);
        }
        self
    }

    /// Remove a content type.
    pub fn without_content_type(mut self, content_type: MessageContentType) -> Self {
        self.content_types.retain(|c| *c != content_type);
        self
    }

    /// Declare a connection parameter.
    pub fn parameter(mut self, descriptor: ParameterDescriptor) -> Self {
        self.parameters.push(descriptor);
        self
    }

    /// Remove a connection parameter by name.
    pub fn without_parameter(mut self, name: &str) -> Self {
        self.parameters.retain(|p| p.name != name);
        self
    }

    /// Make an already-declared parameter required. The name is resolved
    /// when the schema is built, so ordering against
    /// [`parameter`](Self::parameter) calls does not matter.
    pub fn require_parameter(mut self, name: impl Into<String>) -> Self {
        self.require_parameters.push(name.into());
        self
    }

    /// Declare a per-message property.
    pub fn message_property(mut self, descriptor: ParameterDescriptor) -> Self {
        self.message_properties.push(descriptor);
        self
    }

    /// Remove a message property by name.
    pub fn without_message_property(mut self, name: &str) -> Self {
        self.message_properties.retain(|p| p.name != name);
        self
    }

    /// Declare an endpoint type the channel exchanges messages with.
    pub fn endpoint(mut self, declaration: EndpointDeclaration) -> Self {
        self.endpoints.push(declaration);
        self
    }

    /// Remove an endpoint declaration by type.
    pub fn without_endpoint(mut self, endpoint_type: EndpointType) -> Self {
        self.endpoints.retain(|e| e.endpoint_type != endpoint_type);
        self
    }

    /// Declare an accepted authentication mechanism. Adding one twice is
    /// a no-op.
    pub fn auth_type(mut self, auth_type: AuthenticationType) -> Self {
        if !self.authentication_types.contains(&auth_type) {
            self.authentication_types.push(auth_type);
        }
        self
    }

    /// Remove an authentication mechanism. Removing
    /// [`Basic`](AuthenticationType::Basic) also clears any designated
    /// credential parameters.
    pub fn without_auth_type(mut self, auth_type: AuthenticationType) -> Self {
        self.authentication_types.retain(|a| *a != auth_type);
        if auth_type == AuthenticationType::Basic {
            self.basic_credentials = None;
        }
        self
    }

    /// Accept Basic authentication, designating the two connection
    /// parameters that carry the identifier and the secret. Both names
    /// must refer to declared parameters when the schema is built, and
    /// values for them become mandatory at validation time.
    pub fn basic_auth(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.basic_credentials = Some((id.into(), secret.into()));
        self.auth_type(AuthenticationType::Basic)
    }

    /// Check the definition and build the immutable schema.
    ///
    /// All defects are collected before returning, so one failed build
    /// reports everything wrong with the definition at once.
    pub fn build(self) -> Result<ChannelSchema> {
        let mut defects = Vec::new();

        let version = match self.version.parse::<Version>() {
            Ok(v) => v,
            Err(e) => {
                defects.push(format!("invalid schema version '{}': {e}", self.version));
                Version::new(0, 0, 0)
            }
        };

        let mut parameters = self.parameters;
        for name in &self.require_parameters {
            match parameters.iter_mut().find(|p| p.name == *name) {
                Some(descriptor) => descriptor.required = true,
                None => defects.push(format!("cannot require unknown parameter '{name}'")),
            }
        }

        let display_name = self
            .display_name
            .unwrap_or_else(|| format!("{} {}", self.provider, self.channel_type));

        let schema = ChannelSchema {
            identity: ChannelIdentity::new(self.provider, self.channel_type, version),
            display_name,
            description: self.description,
            capabilities: self.capabilities,
            content_types: self.content_types,
            parameters,
            message_properties: self.message_properties,
            endpoints: self.endpoints,
            authentication_types: self.authentication_types,
            basic_credentials: self.basic_credentials,
        };

        defects.extend(schema.definition_defects());
        if defects.is_empty() {
            Ok(schema)
        } else {
            Err(SchemaError::invalid(defects))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sms_schema() -> ChannelSchema {
        ChannelSchema::builder("twilio", "sms", "1.0.0")
            .display_name("Twilio SMS")
            .capabilities(Capability::SendMessages | Capability::ReceiveMessages)
            .content_type(MessageContentType::PlainText)
            .parameter(ParameterDescriptor::string("account_sid").required())
            .parameter(ParameterDescriptor::string("auth_token").required().sensitive())
            .endpoint(
                EndpointDeclaration::new(EndpointType::PhoneNumber)
                    .sending()
                    .receiving(),
            )
            .basic_auth("account_sid", "auth_token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_minimal_schema_builds() {
        let schema = ChannelSchema::builder("acme", "push", "0.1.0")
            .capability(Capability::SendMessages)
            .build()
            .unwrap();
        assert_eq!(schema.provider(), "acme");
        assert_eq!(schema.channel_type(), "push");
        assert_eq!(schema.version(), &Version::new(0, 1, 0));
        assert_eq!(schema.display_name(), "acme push");
    }

    #[test]
    fn test_full_schema_accessors() {
        let schema = sms_schema();
        assert_eq!(schema.display_name(), "Twilio SMS");
        assert!(schema.has_capability(Capability::SendMessages));
        assert!(!schema.has_capability(Capability::Templates));
        assert!(schema.supports_content_type(MessageContentType::PlainText));
        assert!(!schema.supports_content_type(MessageContentType::Html));
        assert!(schema.parameter("account_sid").is_some());
        assert!(schema.parameter("unknown").is_none());
        assert!(schema.endpoint(EndpointType::PhoneNumber).is_some());
        assert!(schema.supports_authentication(AuthenticationType::Basic));
        assert_eq!(
            schema.basic_credentials(),
            Some(("account_sid", "auth_token"))
        );
        assert_eq!(schema.to_string(), "twilio/sms@1.0.0");
    }

    #[test]
    fn test_build_collects_every_defect() {
        let err = ChannelSchema::builder("", "sms", "not-semver")
            .parameter(ParameterDescriptor::string("key"))
            .parameter(ParameterDescriptor::string("key"))
            .endpoint(EndpointDeclaration::new(EndpointType::Url))
            .build()
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("invalid schema version 'not-semver'"));
        assert!(text.contains("channel provider must not be empty"));
        assert!(text.contains("duplicate parameter 'key'"));
        assert!(text.contains("endpoint 'Url' must declare at least one direction"));
    }

    #[test]
    fn test_basic_auth_credentials_must_be_declared() {
        let err = ChannelSchema::builder("acme", "sms", "1.0.0")
            .parameter(ParameterDescriptor::string("account").required())
            .basic_auth("account", "token")
            .build()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("basic authentication credential 'token' is not a declared parameter"));
    }

    #[test]
    fn test_basic_auth_credentials_must_differ() {
        let err = ChannelSchema::builder("acme", "sms", "1.0.0")
            .parameter(ParameterDescriptor::string("account").required())
            .basic_auth("account", "account")
            .build()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("must name two distinct parameters"));
    }

    #[test]
    fn test_require_parameter_resolves_at_build() {
        let schema = ChannelSchema::builder("acme", "sms", "1.0.0")
            .require_parameter("region")
            .parameter(ParameterDescriptor::string("region"))
            .build()
            .unwrap();
        assert!(schema.parameter("region").unwrap().required);

        let err = ChannelSchema::builder("acme", "sms", "1.0.0")
            .require_parameter("missing")
            .build()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("cannot require unknown parameter 'missing'"));
    }

    #[test]
    fn test_restrict_seeds_a_full_copy() {
        let base = sms_schema();
        let derived = base.restrict("1.1.0").build().unwrap();
        assert_eq!(derived.provider(), base.provider());
        assert_eq!(derived.channel_type(), base.channel_type());
        assert_eq!(derived.version(), &Version::new(1, 1, 0));
        assert_eq!(derived.capabilities(), base.capabilities());
        assert_eq!(derived.parameters(), base.parameters());
        assert!(base.is_compatible_with(&derived));
    }

    #[test]
    fn test_restrict_can_drop_and_tighten() {
        let base = sms_schema();
        let derived = base
            .restrict("1.1.0")
            .without_capability(Capability::ReceiveMessages)
            .without_auth_type(AuthenticationType::Basic)
            .without_parameter("auth_token")
            .build()
            .unwrap();
        assert!(!derived.has_capability(Capability::ReceiveMessages));
        assert!(derived.parameter("auth_token").is_none());
        assert!(derived.basic_credentials().is_none());
    }

    #[test]
    fn test_without_auth_type_clears_credentials() {
        let base = sms_schema();
        let derived = base
            .restrict("1.1.0")
            .without_auth_type(AuthenticationType::Basic)
            .build()
            .unwrap();
        assert!(derived.authentication_types().is_empty());
        assert!(derived.basic_credentials().is_none());
    }

    #[test]
    fn test_is_compatible_with_ignores_version() {
        let a = sms_schema();
        let b = a.restrict("2.0.0").build().unwrap();
        let other = ChannelSchema::builder("twilio", "whatsapp", "1.0.0")
            .capability(Capability::SendMessages)
            .build()
            .unwrap();
        assert!(a.is_compatible_with(&a));
        assert!(a.is_compatible_with(&b));
        assert!(b.is_compatible_with(&a));
        assert!(!a.is_compatible_with(&other));
    }

    #[test]
    fn test_identity_parse_rejects_bad_versions() {
        let err = ChannelIdentity::parse("twilio", "sms", "one.two").unwrap_err();
        assert!(matches!(err, SchemaError::Version { .. }));

        let identity = ChannelIdentity::parse("twilio", "sms", "1.2.3").unwrap();
        assert_eq!(identity.to_string(), "twilio/sms@1.2.3");
    }

    #[test]
    fn test_serde_roundtrip_then_validate() {
        let schema = sms_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: ChannelSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
        assert!(parsed.validate().is_ok());
    }
}
