//! Restriction checking: verifying that a derived schema only narrows
//! its base.
//!
//! A restriction may drop capabilities, content types, parameters,
//! endpoints, and authentication types, tighten optional parameters into
//! required ones, and shrink allowed-value sets. It may never widen any
//! of these. Like data validation, the check accumulates every violation
//! instead of stopping at the first.

use crate::schema::{ChannelSchema, ParameterDescriptor};
use crate::validation::ValidationError;

impl ChannelSchema {
    /// Check that this schema is a valid restriction of `base`.
    ///
    /// Returns every way in which this schema widens the base; an empty
    /// result means it is a true narrowing. Allowed-value sets are
    /// compared under the base parameter's coercion rules, so `"5"` and
    /// `5` match for numeric types.
    pub fn validate_as_restriction_of(&self, base: &ChannelSchema) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.provider() != base.provider() {
            errors.push(ValidationError::for_field(
                "provider",
                format!(
                    "Provider '{}' does not match base provider '{}'",
                    self.provider(),
                    base.provider()
                ),
            ));
        }
        if self.channel_type() != base.channel_type() {
            errors.push(ValidationError::for_field(
                "channel_type",
                format!(
                    "Channel type '{}' does not match base channel type '{}'",
                    self.channel_type(),
                    base.channel_type()
                ),
            ));
        }

        for capability in self.capabilities().difference(base.capabilities()).iter() {
            errors.push(ValidationError::for_field(
                "capabilities",
                format!("Capability '{capability}' is not granted by the base schema"),
            ));
        }

        for content_type in self.content_types() {
            if !base.supports_content_type(*content_type) {
                errors.push(ValidationError::for_field(
                    "content_types",
                    format!("Content type '{content_type}' is not supported by the base schema"),
                ));
            }
        }

        check_descriptors(
            self.parameters(),
            base.parameters(),
            "Parameter",
            &mut errors,
        );
        check_descriptors(
            self.message_properties(),
            base.message_properties(),
            "Message property",
            &mut errors,
        );

        for declaration in self.endpoints() {
            let endpoint_type = declaration.endpoint_type;
            let base_declaration = match base.endpoint(endpoint_type) {
                Some(d) => d,
                None => {
                    errors.push(ValidationError::for_field(
                        endpoint_type.name(),
                        format!("Endpoint type '{endpoint_type}' is not declared by the base schema"),
                    ));
                    continue;
                }
            };
            if declaration.can_send && !base_declaration.can_send {
                errors.push(ValidationError::for_field(
                    endpoint_type.name(),
                    format!("Endpoint '{endpoint_type}' permits sending but the base schema does not"),
                ));
            }
            if declaration.can_receive && !base_declaration.can_receive {
                errors.push(ValidationError::for_field(
                    endpoint_type.name(),
                    format!(
                        "Endpoint '{endpoint_type}' permits receiving but the base schema does not"
                    ),
                ));
            }
            if base_declaration.required && !declaration.required {
                errors.push(ValidationError::for_field(
                    endpoint_type.name(),
                    format!(
                        "Endpoint '{endpoint_type}' is required by the base schema but optional in the restriction"
                    ),
                ));
            }
        }
        for base_declaration in base.endpoints() {
            let endpoint_type = base_declaration.endpoint_type;
            if base_declaration.required && self.endpoint(endpoint_type).is_none() {
                errors.push(ValidationError::for_field(
                    endpoint_type.name(),
                    format!(
                        "Endpoint '{endpoint_type}' is required by the base schema but missing from the restriction"
                    ),
                ));
            }
        }

        for auth_type in self.authentication_types() {
            if !base.supports_authentication(*auth_type) {
                errors.push(ValidationError::for_field(
                    "authentication_types",
                    format!(
                        "Authentication type '{auth_type}' is not supported by the base schema"
                    ),
                ));
            }
        }

        errors
    }
}

fn check_descriptors(
    derived: &[ParameterDescriptor],
    base: &[ParameterDescriptor],
    label: &str,
    errors: &mut Vec<ValidationError>,
) {
    for descriptor in derived {
        let base_descriptor = match base.iter().find(|p| p.name == descriptor.name) {
            Some(b) => b,
            None => {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "{label} '{}' is not declared by the base schema",
                        descriptor.name
                    ),
                ));
                continue;
            }
        };
        if !descriptor
            .parameter_type
            .narrows(base_descriptor.parameter_type)
        {
            errors.push(ValidationError::for_field(
                &descriptor.name,
                format!(
                    "{label} '{}' declares type {} which does not narrow base type {}",
                    descriptor.name, descriptor.parameter_type, base_descriptor.parameter_type
                ),
            ));
        }
        if base_descriptor.required && !descriptor.required {
            errors.push(ValidationError::for_field(
                &descriptor.name,
                format!(
                    "{label} '{}' is required by the base schema but optional in the restriction",
                    descriptor.name
                ),
            ));
        }
        if base_descriptor.sensitive && !descriptor.sensitive {
            errors.push(ValidationError::for_field(
                &descriptor.name,
                format!("{label} '{}' must remain sensitive", descriptor.name),
            ));
        }
        if !base_descriptor.allowed_values.is_empty() {
            let widens = descriptor.allowed_values.is_empty()
                || descriptor
                    .allowed_values
                    .iter()
                    .any(|value| !base_descriptor.value_allowed(value));
            if widens {
                errors.push(ValidationError::for_field(
                    &descriptor.name,
                    format!(
                        "{label} '{}' allows values outside the base schema's allowed set",
                        descriptor.name
                    ),
                ));
            }
        }
    }

    for base_descriptor in base {
        if base_descriptor.required && !derived.iter().any(|p| p.name == base_descriptor.name) {
            errors.push(ValidationError::for_field(
                &base_descriptor.name,
                format!(
                    "{label} '{}' is required by the base schema but missing from the restriction",
                    base_descriptor.name
                ),
            ));
        }
    }
}
