//! Session error types.

use ontic_core::ConceptError;
use thiserror::Error;

/// Errors loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting outside its allowed range.
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for ConceptError {
    fn from(e: ConfigError) -> Self {
        ConceptError::invalid_config(e.to_string())
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
