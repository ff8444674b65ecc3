//! SendGrid email channel schemas.

use crosswire_core::{
    AuthenticationType, Capability, ChannelSchema, EndpointDeclaration, EndpointType,
    MessageContentType, ParameterDescriptor,
};
use once_cell::sync::Lazy;

/// The full SendGrid email channel.
pub static SENDGRID_EMAIL: Lazy<ChannelSchema> = Lazy::new(|| {
    ChannelSchema::builder("sendgrid", "email", "1.0.0")
        .display_name("SendGrid Email")
        .description("Email delivery over the SendGrid v3 API")
        .capabilities(
            Capability::SendMessages
                | Capability::MessageStatusQuery
                | Capability::HandleMessageState
                | Capability::BulkMessaging
                | Capability::Templates
                | Capability::MediaAttachments
                | Capability::HealthCheck,
        )
        .content_type(MessageContentType::PlainText)
        .content_type(MessageContentType::Html)
        .content_type(MessageContentType::Template)
        .content_type(MessageContentType::Multipart)
        .parameter(
            ParameterDescriptor::string("api_key")
                .required()
                .sensitive()
                .with_description("SendGrid API key"),
        )
        .parameter(ParameterDescriptor::boolean("sandbox_mode").with_default(false))
        .parameter(ParameterDescriptor::string("ip_pool"))
        .parameter(ParameterDescriptor::boolean("click_tracking").with_default(true))
        .message_property(ParameterDescriptor::string("subject").required())
        .message_property(ParameterDescriptor::string("categories"))
        .message_property(ParameterDescriptor::string("reply_to"))
        .message_property(ParameterDescriptor::date_time("send_at"))
        .endpoint(
            EndpointDeclaration::new(EndpointType::EmailAddress)
                .sending()
                .receiving()
                .required(),
        )
        .auth_type(AuthenticationType::ApiKey)
        .build()
        .expect("sendgrid email schema is valid")
});

/// Transactional variant of [`SENDGRID_EMAIL`]: single recipients only,
/// no scheduling.
pub static SENDGRID_TRANSACTIONAL: Lazy<ChannelSchema> = Lazy::new(|| {
    SENDGRID_EMAIL
        .restrict("1.1.0")
        .display_name("SendGrid Transactional")
        .without_capability(Capability::BulkMessaging)
        .without_content_type(MessageContentType::Multipart)
        .without_message_property("categories")
        .without_message_property("send_at")
        .build()
        .expect("sendgrid transactional schema is valid")
});
