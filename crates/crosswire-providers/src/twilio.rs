//! Twilio SMS channel schemas.

use crosswire_core::{
    Capability, ChannelSchema, EndpointDeclaration, EndpointType, MessageContentType,
    ParameterDescriptor,
};
use once_cell::sync::Lazy;

/// The full Twilio SMS channel.
pub static TWILIO_SMS: Lazy<ChannelSchema> = Lazy::new(|| {
    ChannelSchema::builder("twilio", "sms", "1.0.0")
        .display_name("Twilio SMS")
        .description("SMS messaging over the Twilio REST API")
        .capabilities(
            Capability::SendMessages
                | Capability::ReceiveMessages
                | Capability::MessageStatusQuery
                | Capability::HandleMessageState
                | Capability::BulkMessaging
                | Capability::Templates
                | Capability::MediaAttachments
                | Capability::HealthCheck,
        )
        .content_type(MessageContentType::PlainText)
        .content_type(MessageContentType::Media)
        .content_type(MessageContentType::Template)
        .content_type(MessageContentType::Multipart)
        .parameter(ParameterDescriptor::string("account_sid").with_description("Account SID"))
        .parameter(
            ParameterDescriptor::string("auth_token")
                .sensitive()
                .with_description("Auth token for the account"),
        )
        .parameter(
            ParameterDescriptor::string("region")
                .with_allowed_values(["us1", "ie1", "au1"])
                .with_default("us1"),
        )
        .parameter(ParameterDescriptor::string("edge"))
        .parameter(ParameterDescriptor::integer("timeout").with_default(30))
        .message_property(ParameterDescriptor::integer("validity_period"))
        .message_property(ParameterDescriptor::boolean("smart_encoded"))
        .message_property(
            ParameterDescriptor::string("schedule_type").with_allowed_values(["fixed"]),
        )
        .message_property(ParameterDescriptor::date_time("send_at"))
        .endpoint(
            EndpointDeclaration::new(EndpointType::PhoneNumber)
                .sending()
                .receiving()
                .required(),
        )
        .basic_auth("account_sid", "auth_token")
        .build()
        .expect("twilio sms schema is valid")
});

/// Plain-text only variant of [`TWILIO_SMS`], for accounts without media
/// or template access.
pub static SIMPLE_SMS: Lazy<ChannelSchema> = Lazy::new(|| {
    TWILIO_SMS
        .restrict("1.1.0")
        .display_name("Twilio SMS (simple)")
        .without_capability(Capability::MessageStatusQuery)
        .without_capability(Capability::BulkMessaging)
        .without_capability(Capability::Templates)
        .without_capability(Capability::MediaAttachments)
        .without_content_type(MessageContentType::Media)
        .without_content_type(MessageContentType::Template)
        .without_content_type(MessageContentType::Multipart)
        .without_parameter("edge")
        .without_parameter("region")
        .parameter(
            ParameterDescriptor::string("region")
                .with_allowed_values(["us1"])
                .with_default("us1"),
        )
        .without_message_property("smart_encoded")
        .without_message_property("schedule_type")
        .without_message_property("send_at")
        .build()
        .expect("simple sms schema is valid")
});

/// Batch-oriented variant of [`TWILIO_SMS`] that keeps bulk delivery but
/// drops per-message extras.
pub static BULK_SMS: Lazy<ChannelSchema> = Lazy::new(|| {
    TWILIO_SMS
        .restrict("1.2.0")
        .display_name("Twilio SMS (bulk)")
        .without_capability(Capability::Templates)
        .without_capability(Capability::MediaAttachments)
        .without_content_type(MessageContentType::Media)
        .without_content_type(MessageContentType::Template)
        .without_content_type(MessageContentType::Multipart)
        .without_message_property("send_at")
        .without_message_property("schedule_type")
        .build()
        .expect("bulk sms schema is valid")
});

#[cfg(test)]
mod tests {
    use super::*;
    use crosswire_core::{AuthenticationType, ConnectionSettings};

    #[test]
    fn test_schema_shape() {
        assert_eq!(TWILIO_SMS.to_string(), "twilio/sms@1.0.0");
        assert!(TWILIO_SMS.has_capability(Capability::MediaAttachments));
        assert!(TWILIO_SMS.supports_authentication(AuthenticationType::Basic));
        assert_eq!(
            TWILIO_SMS.basic_credentials(),
            Some(("account_sid", "auth_token"))
        );
        let phone = TWILIO_SMS.endpoint(EndpointType::PhoneNumber).unwrap();
        assert!(phone.can_send && phone.can_receive && phone.required);
    }

    #[test]
    fn test_credentials_are_mandatory() {
        let errors = TWILIO_SMS.validate_connection_settings(&ConnectionSettings::new());
        let messages: Vec<&str> = errors.iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Required parameter 'account_sid' is missing",
                "Required parameter 'auth_token' is missing",
            ]
        );
    }

    #[test]
    fn test_valid_settings_pass() {
        let settings = ConnectionSettings::new()
            .with_value("account_sid", "AC123")
            .with_value("auth_token", "t0ken")
            .with_value("region", "ie1")
            .with_value("timeout", "45");
        assert!(TWILIO_SMS.validate_connection_settings(&settings).is_empty());
    }

    #[test]
    fn test_variants_are_valid_restrictions() {
        assert!(SIMPLE_SMS.validate_as_restriction_of(&TWILIO_SMS).is_empty());
        assert!(BULK_SMS.validate_as_restriction_of(&TWILIO_SMS).is_empty());
    }

    #[test]
    fn test_simple_variant_narrows() {
        assert!(!SIMPLE_SMS.has_capability(Capability::MediaAttachments));
        assert!(!SIMPLE_SMS.supports_content_type(MessageContentType::Media));
        assert!(SIMPLE_SMS.supports_content_type(MessageContentType::PlainText));

        let settings = ConnectionSettings::new()
            .with_value("account_sid", "AC123")
            .with_value("auth_token", "t0ken")
            .with_value("region", "ie1");
        let errors = SIMPLE_SMS.validate_connection_settings(&settings);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message(),
            "Parameter 'region' has a value not in its allowed set"
        );
    }

    #[test]
    fn test_bulk_variant_keeps_bulk_messaging() {
        assert!(BULK_SMS.has_capability(Capability::BulkMessaging));
        assert!(!BULK_SMS.has_capability(Capability::Templates));
        assert!(BULK_SMS.message_property("validity_period").is_some());
        assert!(BULK_SMS.message_property("send_at").is_none());
    }
}
