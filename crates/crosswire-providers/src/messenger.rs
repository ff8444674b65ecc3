//! Meta Messenger channel schema.

use crosswire_core::{
    AuthenticationType, Capability, ChannelSchema, EndpointDeclaration, EndpointType,
    MessageContentType, ParameterDescriptor,
};
use once_cell::sync::Lazy;

/// Messenger conversations through the Meta Graph API.
pub static MESSENGER: Lazy<ChannelSchema> = Lazy::new(|| {
    ChannelSchema::builder("meta", "messenger", "1.0.0")
        .display_name("Meta Messenger")
        .description("Messenger conversations over the Meta Graph API")
        .capabilities(
            Capability::SendMessages
                | Capability::ReceiveMessages
                | Capability::HandleMessageState
                | Capability::Templates
                | Capability::MediaAttachments
                | Capability::HealthCheck,
        )
        .content_type(MessageContentType::PlainText)
        .content_type(MessageContentType::Media)
        .content_type(MessageContentType::Template)
        .parameter(ParameterDescriptor::string("page_id").required())
        .parameter(
            ParameterDescriptor::string("access_token")
                .required()
                .sensitive(),
        )
        .parameter(ParameterDescriptor::string("api_version").with_default("v19.0"))
        .message_property(
            ParameterDescriptor::string("messaging_type")
                .with_allowed_values(["RESPONSE", "UPDATE", "MESSAGE_TAG"])
                .with_default("RESPONSE"),
        )
        .message_property(ParameterDescriptor::string("tag"))
        .message_property(
            ParameterDescriptor::string("notification_type")
                .with_allowed_values(["REGULAR", "SILENT_PUSH", "NO_PUSH"]),
        )
        .endpoint(
            EndpointDeclaration::new(EndpointType::UserId)
                .sending()
                .receiving(),
        )
        .auth_type(AuthenticationType::Token)
        .build()
        .expect("messenger schema is valid")
});
