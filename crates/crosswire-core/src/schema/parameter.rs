//! Parameter descriptors and the value-coercion rules used to validate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Semantic type of a configuration parameter or message property.
///
/// Values arrive as JSON, so each type accepts a small set of JSON shapes:
///
/// | Type       | Accepted values                                             |
/// |------------|-------------------------------------------------------------|
/// | `String`   | any JSON string                                             |
/// | `Integer`  | an integral JSON number, or a string parsing as `i64`       |
/// | `Decimal`  | any finite JSON number, or a string parsing as a finite `f64` |
/// | `Boolean`  | a JSON bool, or `"true"` / `"false"` (case-insensitive)     |
/// | `DateTime` | an RFC 3339 timestamp string                                |
///
/// JSON `null` is treated as absent everywhere and never reaches these rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
}

impl ParameterType {
    /// Whether a supplied JSON value can be read as this type.
    pub fn accepts(self, value: &Value) -> bool {
        self.canonicalize(value).is_some()
    }

    /// Convert a supplied value to canonical form, or `None` if incompatible.
    ///
    /// Canonical forms: `String` stays a string, `Integer` becomes an `i64`
    /// number, `Decimal` an `f64` number, `Boolean` a bool, and `DateTime`
    /// an RFC 3339 string normalized to UTC. Canonicalization makes
    /// allowed-value comparison insensitive to spelling (`5` vs `"5"`,
    /// offset vs UTC timestamps).
    pub fn canonicalize(self, value: &Value) -> Option<Value> {
        match self {
            ParameterType::String => value.as_str().map(|s| Value::String(s.to_string())),
            ParameterType::Integer => match value {
                Value::Number(n) => n.as_i64().map(Value::from),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            ParameterType::Decimal => match value {
                Value::Number(n) => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number),
                _ => None,
            },
            ParameterType::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::String(s) => {
                    if s.eq_ignore_ascii_case("true") {
                        Some(Value::Bool(true))
                    } else if s.eq_ignore_ascii_case("false") {
                        Some(Value::Bool(false))
                    } else {
                        None
                    }
                }
                _ => None,
            },
            ParameterType::DateTime => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| Value::String(dt.with_timezone(&Utc).to_rfc3339())),
                _ => None,
            },
        }
    }

    /// Whether this type narrows `base`: every value in this type's domain
    /// also belongs to the base type's domain.
    ///
    /// Integers are valid decimals, and any scalar can be carried as a
    /// string, so `Integer` narrows `Decimal` and every type narrows
    /// `String`. Used by restriction checks, where a derived schema may
    /// tighten a parameter's type but never loosen it.
    pub fn narrows(self, base: ParameterType) -> bool {
        if self == base {
            return true;
        }
        matches!(
            (self, base),
            (ParameterType::Integer, ParameterType::Decimal)
                | (ParameterType::Integer, ParameterType::String)
                | (ParameterType::Decimal, ParameterType::String)
                | (ParameterType::Boolean, ParameterType::String)
                | (ParameterType::DateTime, ParameterType::String)
        )
    }

    /// Type name as it appears in validation messages.
    pub const fn name(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Decimal => "decimal",
            ParameterType::Boolean => "boolean",
            ParameterType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares one named, typed value a channel accepts, either as a
/// connection setting or as a per-message property.
///
/// Descriptors are declarative only. They carry no values; supplied values
/// are checked against them by the schema's validation methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name, unique within its owning collection.
    pub name: String,

    /// Declared semantic type.
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,

    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,

    /// Marks values that must never be logged or echoed back.
    #[serde(default)]
    pub sensitive: bool,

    /// Value assumed when an optional parameter is not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Closed set of legal values. Empty means any type-compatible value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<Value>,

    /// Human-readable description for configuration tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDescriptor {
    /// Create a descriptor with the given name and type. Optional,
    /// non-sensitive, unrestricted by default.
    pub fn new(name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            required: false,
            sensitive: false,
            default_value: None,
            allowed_values: Vec::new(),
            description: None,
        }
    }

    /// A string-typed descriptor.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::String)
    }

    /// An integer-typed descriptor.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Integer)
    }

    /// A decimal-typed descriptor.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Decimal)
    }

    /// A boolean-typed descriptor.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Boolean)
    }

    /// A datetime-typed descriptor.
    pub fn date_time(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::DateTime)
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the parameter as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Set the default value used when the parameter is not supplied.
    /// Only meaningful on optional parameters.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Restrict the parameter to a closed set of values.
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Whether `value` is a member of the allowed set, comparing in
    /// canonical form. Always true when no allowed set is declared.
    pub fn value_allowed(&self, value: &Value) -> bool {
        if self.allowed_values.is_empty() {
            return true;
        }
        let canonical = match self.parameter_type.canonicalize(value) {
            Some(v) => v,
            None => return false,
        };
        self.allowed_values
            .iter()
            .any(|allowed| self.parameter_type.canonicalize(allowed).as_ref() == Some(&canonical))
    }

    /// Internal-consistency defects in this descriptor, labelled for its
    /// owning collection ("parameter" or "message property"). Empty when
    /// the descriptor is well-formed.
    pub(crate) fn defects(&self, label: &str) -> Vec<String> {
        let mut defects = Vec::new();
        if self.name.trim().is_empty() {
            defects.push(format!("{label} name must not be empty"));
            return defects;
        }
        if self.required && self.default_value.is_some() {
            defects.push(format!(
                "{label} '{}' is required and cannot declare a default value",
                self.name
            ));
        }
        if let Some(default) = &self.default_value {
            if !self.parameter_type.accepts(default) {
                defects.push(format!(
                    "default value for {label} '{}' is not a valid {}",
                    self.name, self.parameter_type
                ));
            } else if !self.value_allowed(default) {
                defects.push(format!(
                    "default value for {label} '{}' is not in its allowed set",
                    self.name
                ));
            }
        }
        for allowed in &self.allowed_values {
            if !self.parameter_type.accepts(allowed) {
                defects.push(format!(
                    "allowed value {allowed} for {label} '{}' is not a valid {}",
                    self.name, self.parameter_type
                ));
            }
        }
        defects
    }
}
