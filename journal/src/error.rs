//! Journal error types.

use ontic_core::ConceptError;
use thiserror::Error;

/// Journal errors.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The hook refused the transaction.
    #[error("commit rejected: {message}")]
    Rejected { message: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

impl From<JournalError> for ConceptError {
    fn from(error: JournalError) -> Self {
        ConceptError::persistence(error.to_string())
    }
}

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;
