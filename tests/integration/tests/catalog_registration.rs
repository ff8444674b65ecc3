//! Catalog registration integration tests.
//!
//! These tests load the built-in provider schemas into a registry the way
//! an application would at startup: base schemas first, then derived
//! schemas registered as restrictions so the narrowing guarantee is
//! enforced at the door.

use crosswire_connectors::{ConnectorError, ConnectorRegistry};
use crosswire_core::{Capability, ChannelIdentity, MessageContentType};
use crosswire_providers::{
    catalog, BULK_SMS, FIREBASE_PUSH, MESSENGER, SENDGRID_EMAIL, SENDGRID_TRANSACTIONAL,
    SIMPLE_SMS, TWILIO_SMS,
};

/// Register every built-in schema, derived ones as checked restrictions.
async fn load_catalog(registry: &ConnectorRegistry) {
    for base in [&*TWILIO_SMS, &*SENDGRID_EMAIL, &*FIREBASE_PUSH, &*MESSENGER] {
        registry.register_schema(base.clone()).await.unwrap();
    }
    registry
        .register_restriction(SIMPLE_SMS.clone(), TWILIO_SMS.identity())
        .await
        .unwrap();
    registry
        .register_restriction(BULK_SMS.clone(), TWILIO_SMS.identity())
        .await
        .unwrap();
    registry
        .register_restriction(SENDGRID_TRANSACTIONAL.clone(), SENDGRID_EMAIL.identity())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_catalog_registers_cleanly() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    assert_eq!(registry.count().await, catalog().len());
    for schema in catalog() {
        let registered = registry
            .schema(schema.identity())
            .await
            .expect("every catalog schema should be registered");
        assert_eq!(&registered, schema);
    }
}

#[tokio::test]
async fn test_listing_is_sorted() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    let expected: Vec<ChannelIdentity> = [
        ("firebase", "push", "1.0.0"),
        ("meta", "messenger", "1.0.0"),
        ("sendgrid", "email", "1.0.0"),
        ("sendgrid", "email", "1.1.0"),
        ("twilio", "sms", "1.0.0"),
        ("twilio", "sms", "1.1.0"),
        ("twilio", "sms", "1.2.0"),
    ]
    .into_iter()
    .map(|(provider, channel_type, version)| {
        ChannelIdentity::parse(provider, channel_type, version).unwrap()
    })
    .collect();
    assert_eq!(registry.list().await, expected);
}

#[tokio::test]
async fn test_provider_schemas_are_version_ordered() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    let twilio = registry.schemas_for_provider("twilio").await;
    let versions: Vec<String> = twilio.iter().map(|s| s.version().to_string()).collect();
    assert_eq!(versions, ["1.0.0", "1.1.0", "1.2.0"]);
    assert!(registry.schemas_for_provider("vonage").await.is_empty());
}

#[tokio::test]
async fn test_double_load_is_rejected() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    let err = registry
        .register_schema(TWILIO_SMS.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::AlreadyExists(_)));
    assert_eq!(registry.count().await, catalog().len());
}

#[tokio::test]
async fn test_widening_derivative_is_rejected() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    // Try to re-grow features the simple tier dropped from the full one.
    let widened = SIMPLE_SMS
        .restrict("1.3.0")
        .capability(Capability::Templates)
        .content_type(MessageContentType::Media)
        .build()
        .unwrap();
    let err = registry
        .register_restriction(widened, SIMPLE_SMS.identity())
        .await
        .unwrap_err();

    let messages: Vec<&str> = err.validation_errors().iter().map(|e| e.message()).collect();
    assert_eq!(messages.len(), 2, "both widenings should be reported");
    assert!(messages.contains(&"Capability 'Templates' is not granted by the base schema"));
    assert!(messages.contains(&"Content type 'Media' is not supported by the base schema"));
    assert_eq!(
        registry.count().await,
        catalog().len(),
        "a rejected restriction should not be registered"
    );
}

#[tokio::test]
async fn test_cross_provider_restriction_is_rejected() {
    let registry = ConnectorRegistry::new();
    load_catalog(&registry).await;

    let derived = SENDGRID_TRANSACTIONAL.restrict("2.0.0").build().unwrap();
    let err = registry
        .register_restriction(derived, TWILIO_SMS.identity())
        .await
        .unwrap_err();
    assert!(err
        .validation_errors()
        .iter()
        .any(|e| e.message() == "Provider 'sendgrid' does not match base provider 'twilio'"));
}
