//! Built-in channel schema catalog for Crosswire.
//!
//! Each module declares the schemas for one provider as lazily built
//! statics. The statics are plain [`ChannelSchema`] values; register the
//! ones you need with a connector registry, or validate against them
//! directly:
//!
//! ```rust,ignore
//! use crosswire_core::ConnectionSettings;
//! use crosswire_providers::twilio::TWILIO_SMS;
//!
//! let settings = ConnectionSettings::new()
//!     .with_value("account_sid", "AC123")
//!     .with_value("auth_token", "secret");
//! let failures = TWILIO_SMS.validate_connection_settings(&settings);
//! assert!(failures.is_empty());
//! ```

pub mod firebase;
pub mod messenger;
pub mod sendgrid;
pub mod twilio;

use crosswire_core::ChannelSchema;

pub use firebase::FIREBASE_PUSH;
pub use messenger::MESSENGER;
pub use sendgrid::{SENDGRID_EMAIL, SENDGRID_TRANSACTIONAL};
pub use twilio::{BULK_SMS, SIMPLE_SMS, TWILIO_SMS};

/// Every schema in the catalog, in a stable order. Derived variants
/// follow their base.
pub fn catalog() -> Vec<&'static ChannelSchema> {
    vec![
        &TWILIO_SMS,
        &SIMPLE_SMS,
        &BULK_SMS,
        &SENDGRID_EMAIL,
        &SENDGRID_TRANSACTIONAL,
        &FIREBASE_PUSH,
        &MESSENGER,
    ]
}
