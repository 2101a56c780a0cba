//! Error types for tiered-config.
//!
//! None of these escape the public fetch/resolve entry points: the refresher,
//! resolver and cache persister absorb them and log [`ConfigError::kind`].

use std::fmt;

/// Result type alias for tiered-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// DNS, connection or timeout failure while talking to the remote endpoint.
    #[error("HTTP request failed: {0}")]
    TransportError(String),

    /// The remote endpoint answered with a non-success status.
    #[error("HTTP request failed with status {status}: {reason}")]
    StatusError {
        /// Numeric HTTP status code
        status: u16,
        /// Canonical reason phrase, if known
        reason: String,
    },

    /// The payload is not parseable as the expected structure.
    #[error("Failed to parse configuration: {0}")]
    FormatError(String),

    /// The payload parsed but failed schema validation.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The cache file could not be read or written.
    #[error("Cache persistence failed: {0}")]
    PersistenceError(String),

    /// Generic error for other cases.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// Short, stable label for the failure category, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransportError(_) => "transport",
            Self::StatusError { .. } => "protocol",
            Self::FormatError(_) => "format",
            Self::ValidationError(_) => "schema",
            Self::PersistenceError(_) => "persistence",
            Self::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::FormatError(err.to_string())
    }
}

/// Validation error for snapshot payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}
