//! Scenario error types.

use thiserror::Error;

/// A scenario step that did not behave as asserted.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Step {step} failed: {message}")]
    UnexpectedError { step: String, message: String },

    #[error("Step {step} succeeded, expected: {expected}")]
    UnexpectedSuccess { step: String, expected: String },

    #[error("Step {step} failed with the wrong error: expected {expected}, got {actual}")]
    WrongError {
        step: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid error pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Scenario {scenario} could not open a session: {message}")]
    Session { scenario: String, message: String },
}

impl ScenarioError {
    pub fn unexpected_error(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedError {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn unexpected_success(step: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnexpectedSuccess {
            step: step.into(),
            expected: expected.into(),
        }
    }

    pub fn wrong_error(
        step: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::WrongError {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
