//! Firebase Cloud Messaging push channel schema.

use crosswire_core::{
    AuthenticationType, Capability, ChannelSchema, EndpointDeclaration, EndpointType,
    MessageContentType, ParameterDescriptor,
};
use once_cell::sync::Lazy;

/// Push notifications through Firebase Cloud Messaging.
///
/// Messages address either a device token or a topic; there is no sender
/// endpoint, the Firebase project is the implicit origin.
pub static FIREBASE_PUSH: Lazy<ChannelSchema> = Lazy::new(|| {
    ChannelSchema::builder("firebase", "push", "1.0.0")
        .display_name("Firebase Push")
        .description("Push notifications over Firebase Cloud Messaging")
        .capabilities(
            Capability::SendMessages
                | Capability::BulkMessaging
                | Capability::HandleMessageState
                | Capability::HealthCheck,
        )
        .content_type(MessageContentType::PlainText)
        .content_type(MessageContentType::Media)
        .parameter(ParameterDescriptor::string("project_id").required())
        .parameter(
            ParameterDescriptor::string("service_account_key")
                .required()
                .sensitive(),
        )
        .parameter(ParameterDescriptor::boolean("dry_run").with_default(false))
        .message_property(
            ParameterDescriptor::string("priority")
                .with_allowed_values(["normal", "high"])
                .with_default("normal"),
        )
        .message_property(ParameterDescriptor::integer("ttl"))
        .message_property(ParameterDescriptor::string("collapse_key"))
        .message_property(ParameterDescriptor::integer("badge"))
        .endpoint(EndpointDeclaration::new(EndpointType::DeviceId).receiving())
        .endpoint(EndpointDeclaration::new(EndpointType::Topic).receiving())
        .auth_type(AuthenticationType::OAuth2)
        .build()
        .expect("firebase push schema is valid")
});
