//! End-to-end delivery integration tests.
//!
//! A loopback connector is opened through the registry and driven with
//! valid and invalid traffic to verify that schema enforcement sits
//! between the caller and the connector: bad settings and bad messages
//! are rejected with every failure listed, and nothing invalid ever
//! reaches the connector itself.

use std::sync::Arc;

use crosswire_connectors::{
    ConnectorError, ConnectorRegistry, MemoryConnector, MemoryConnectorFactory,
};
use crosswire_core::{
    Capability, ChannelIdentity, ConnectionSettings, Message, MessageEndpoint,
};
use crosswire_providers::TWILIO_SMS;

fn loopback_identity() -> ChannelIdentity {
    ChannelIdentity::parse("memory", "loopback", "1.0.0").unwrap()
}

/// A registry with the loopback factory installed, plus a handle on the
/// shared message store so tests can observe what was delivered.
async fn loopback_registry() -> (ConnectorRegistry, MemoryConnector) {
    let registry = ConnectorRegistry::new();
    let factory = MemoryConnectorFactory::new();
    let store = factory.connector();
    registry.register_factory(Arc::new(factory)).await.unwrap();
    (registry, store)
}

#[tokio::test]
async fn test_open_and_deliver() {
    let (registry, store) = loopback_registry().await;
    let settings = ConnectionSettings::new().with_value("namespace", "orders");
    let gated = registry.open(&loopback_identity(), &settings).await.unwrap();

    let message = Message::text(MessageEndpoint::user("alice"), "order shipped");
    let receipt = gated.send(&message).await.unwrap();
    assert_eq!(receipt.message_id, message.id);
    assert_eq!(receipt.provider_message_id.as_deref(), Some("mem-1"));

    let delivered = store.delivered().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, message.id);
}

#[tokio::test]
async fn test_open_collects_every_settings_failure() {
    let (registry, _) = loopback_registry().await;

    // Missing required parameter and a mistyped one, reported together.
    let settings = ConnectionSettings::new().with_value("capacity", "lots");
    let err = registry
        .open(&loopback_identity(), &settings)
        .await
        .unwrap_err();
    let failures = err.validation_errors();
    assert_eq!(failures.len(), 2);
    assert_eq!(
        failures[0].message(),
        "Required parameter 'namespace' is missing"
    );
    assert_eq!(
        failures[1].message(),
        "Parameter 'capacity' has an incompatible type (expected integer)"
    );
}

#[tokio::test]
async fn test_invalid_message_never_reaches_the_connector() {
    let (registry, store) = loopback_registry().await;
    let settings = ConnectionSettings::new().with_value("namespace", "orders");
    let gated = registry.open(&loopback_identity(), &settings).await.unwrap();

    // Wrong endpoint type and an undeclared property in one message.
    let message = Message::text(MessageEndpoint::phone("+15550100"), "order shipped")
        .with_property("color", "red");
    let err = gated.send(&message).await.unwrap_err();
    let failures = err.validation_errors();
    assert_eq!(failures.len(), 2);
    assert_eq!(
        failures[0].message(),
        "Endpoint type 'PhoneNumber' is not declared by this channel"
    );
    assert_eq!(failures[1].message(), "Unknown message property 'color'");
    assert!(
        store.delivered().await.is_empty(),
        "rejected messages must not be delivered"
    );
}

#[tokio::test]
async fn test_restricted_channel_loses_health_check() {
    let registry = ConnectorRegistry::new();
    let base = MemoryConnector::default_schema();
    registry.register_schema(base.clone()).await.unwrap();

    let narrowed = base
        .restrict("1.1.0")
        .without_capability(Capability::HealthCheck)
        .build()
        .unwrap();
    registry
        .register_restriction(narrowed.clone(), base.identity())
        .await
        .unwrap();
    registry
        .register_factory(Arc::new(MemoryConnectorFactory::with_schema(
            narrowed.clone(),
        )))
        .await
        .unwrap();

    let settings = ConnectionSettings::new().with_value("namespace", "probe");
    let gated = registry.open(narrowed.identity(), &settings).await.unwrap();

    assert!(matches!(
        gated.test_connection().await.unwrap_err(),
        ConnectorError::CapabilityNotSupported {
            capability: Capability::HealthCheck,
            ..
        }
    ));
    // Sending is still granted on the narrowed channel.
    let message = Message::text(MessageEndpoint::user("alice"), "ping");
    gated.send(&message).await.unwrap();
}

#[tokio::test]
async fn test_shutdown_blocks_further_sends() {
    let (registry, _) = loopback_registry().await;
    let settings = ConnectionSettings::new().with_value("namespace", "orders");
    let gated = registry.open(&loopback_identity(), &settings).await.unwrap();

    gated
        .send(&Message::text(MessageEndpoint::user("alice"), "one"))
        .await
        .unwrap();
    gated.shutdown().await.unwrap();

    let err = gated
        .send(&Message::text(MessageEndpoint::user("alice"), "two"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::NotInitialized(_)));
}

#[tokio::test]
async fn test_provider_schema_drives_a_connector() {
    let registry = ConnectorRegistry::new();
    let factory = MemoryConnectorFactory::with_schema(TWILIO_SMS.clone());
    let store = factory.connector();
    registry.register_factory(Arc::new(factory)).await.unwrap();

    let settings = ConnectionSettings::new()
        .with_value("account_sid", "AC0123456789")
        .with_value("auth_token", "s3cret");
    let gated = registry.open(TWILIO_SMS.identity(), &settings).await.unwrap();

    // SMS channels require an explicit originating phone number.
    let incomplete = Message::text(MessageEndpoint::phone("+15550100"), "hello");
    let err = gated.send(&incomplete).await.unwrap_err();
    assert_eq!(
        err.validation_errors()[0].message(),
        "Message is missing a required 'PhoneNumber' sender endpoint"
    );

    let message = Message::text(MessageEndpoint::phone("+15550100"), "hello")
        .with_sender(MessageEndpoint::phone("+15550199"))
        .with_property("validity_period", 3600);
    gated.send(&message).await.unwrap();

    let delivered = store.delivered().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, message.id);
    assert!(gated.test_connection().await.unwrap().is_healthy());
}
