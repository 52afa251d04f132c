//! Error types for costmap-weights.

use std::fmt;

/// Result type alias for costmap-weights operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised at the edges of the crate: sources, channels and the bridge.
///
/// Reading and writing a [`ConfigCell`](crate::core::ConfigCell) never fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load weights from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize a source into a field record.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// A caller-supplied validator rejected the update.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The file watcher could not be started or driven.
    #[error("File watching error: {0}")]
    WatchError(String),

    /// A required weight is absent from the delivered record.
    #[error("Missing required field '{0}'")]
    MissingField(String),

    /// A weight is present but does not hold a number.
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField {
        /// The offending field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A positional update carried the wrong number of values.
    #[error("Expected {expected} weights, got {found}")]
    FieldCount {
        /// Number of weights a WeightSet holds
        expected: usize,
        /// Number of values supplied
        found: usize,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error returned by caller-supplied weight validators.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific weight has an unacceptable value.
    InvalidField {
        /// The weight name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
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
                write!(f, "Weight '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
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
