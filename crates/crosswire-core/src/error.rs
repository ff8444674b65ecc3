//! Error types for schema construction.

use thiserror::Error;

/// Result alias for schema-construction operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while building or identifying channel schemas.
///
/// Data-validation outcomes are never reported here. The validation
/// functions return accumulated [`ValidationError`](crate::validation::ValidationError)
/// values instead, because a rejected payload is an expected result,
/// not a fault in the caller's code.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema version string is not valid semver.
    #[error("invalid schema version '{version}': {source}")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// The schema definition is internally inconsistent. Every defect found
    /// during the build is included, joined with "; ".
    #[error("invalid schema definition: {0}")]
    Invalid(String),
}

impl SchemaError {
    /// Create a version error from the offending string and the parse failure.
    pub fn version(version: impl Into<String>, source: semver::Error) -> Self {
        Self::Version {
            version: version.into(),
            source,
        }
    }

    /// Create an invalid-definition error from a list of defects.
    pub fn invalid(defects: Vec<String>) -> Self {
        Self::Invalid(defects.join("; "))
    }
}
