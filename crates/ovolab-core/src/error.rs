//! Error types for the Ovolab core library.

use crate::validate::FieldError;

/// Errors produced by the pure domain layer.
///
/// Marked `#[non_exhaustive]` so new variants can be added without a
/// breaking change.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more fields failed client-side validation.
    #[error("Validation error: {}", FieldError::join(.errors))]
    Validation {
        /// Per-field failures, in field declaration order
        errors: Vec<FieldError>,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record was addressed by an id that is not present.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"donadora"`
        entity: &'static str,
        /// Missing record id
        id: i64,
    },
}

/// Convenience `Result` type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a validation error for a single field.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    /// Returns the field errors carried by a validation error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<Vec<FieldError>> for Error {
    fn from(errors: Vec<FieldError>) -> Self {
        Error::Validation { errors }
    }
}
