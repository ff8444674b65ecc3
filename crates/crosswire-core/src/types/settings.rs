//! Connection settings supplied when opening a channel.

use crate::schema::{ChannelSchema, ParameterType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A named bag of JSON values used to configure a connector.
///
/// Settings are validated against a schema's parameter descriptors before
/// a connector is initialized. Keys the schema does not declare are
/// tolerated; provider SDKs often read extra settings of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionSettings {
    values: HashMap<String, Value>,
}

impl ConnectionSettings {
    /// Create an empty settings bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting, consuming and returning the bag.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Insert or replace a setting.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether a non-null value was supplied for `name`. A JSON `null`
    /// counts as absent.
    pub fn is_present(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(v) if !v.is_null())
    }

    /// String value for `name`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Integer value for `name`, reading numbers and numeric strings the
    /// same way validation does.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values
            .get(name)
            .and_then(|v| ParameterType::Integer.canonicalize(v))
            .and_then(|v| v.as_i64())
    }

    /// Decimal value for `name`, reading numbers and numeric strings the
    /// same way validation does.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values
            .get(name)
            .and_then(|v| ParameterType::Decimal.canonicalize(v))
            .and_then(|v| v.as_f64())
    }

    /// Boolean value for `name`, accepting `"true"` / `"false"` strings.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values
            .get(name)
            .and_then(|v| ParameterType::Boolean.canonicalize(v))
            .and_then(|v| v.as_bool())
    }

    /// Iterate over the supplied setting names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of supplied settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no settings were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the settings for logging, masking every parameter the schema
    /// marks sensitive.
    pub fn redacted(&self, schema: &ChannelSchema) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| {
                let sensitive = schema
                    .parameter(name)
                    .map(|p| p.sensitive)
                    .unwrap_or(false);
                let rendered = if sensitive {
                    "***".to_string()
                } else {
                    match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    }
                };
                (name.clone(), rendered)
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for ConnectionSettings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
