//! Error types for the Ovolab client.

use ovolab_core::FieldError;

/// Errors produced by the REST client and its helpers.
///
/// Marked `#[non_exhaustive]` so new variants can be added without a
/// breaking change.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Backend `detail`, or the raw response text
        message: String,
    },

    /// The backend rejected the session. The stored session has been cleared.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Backend `detail`
        message: String,
    },

    /// Input rejected before it was sent.
    #[error("Validation error: {}", FieldError::join(.0))]
    Validation(Vec<FieldError>),

    /// Configuration could not be resolved or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Local file I/O error (config, credentials, photos).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured URL is not usable.
    #[error("Invalid URL '{url}': {message}")]
    Url {
        /// The offending URL
        url: String,
        /// Parser message
        message: String,
    },

    /// Error from the core domain layer.
    #[error("Core error: {0}")]
    Core(ovolab_core::Error),
}

/// Convenience `Result` type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an API error for `status`.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-URL error.
    pub fn url(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Url {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Whether the backend reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Unauthorized { .. } => Some(401),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for showing to a user.
    ///
    /// Backend rejections yield the backend's own message; everything else
    /// yields the error's display text.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } | Error::Unauthorized { message } => message.clone(),
            Error::Validation(errors) => FieldError::join(errors),
            other => other.to_string(),
        }
    }
}

impl From<ovolab_core::Error> for Error {
    fn from(err: ovolab_core::Error) -> Self {
        match err {
            ovolab_core::Error::Validation { errors } => Error::Validation(errors),
            other => Error::Core(other),
        }
    }
}

impl From<Vec<FieldError>> for Error {
    fn from(errors: Vec<FieldError>) -> Self {
        Error::Validation(errors)
    }
}
