//! Error taxonomy of the concept layer.

use crate::{DataType, SchemaKind, ThingId, TypeId, Violation, ViolationKind};
use thiserror::Error;

/// Errors reported by schema and instance operations.
///
/// Every check runs before any state changes, so an error always means the
/// operation had no effect.
#[derive(Debug, Error)]
pub enum ConceptError {
    #[error("Setting {supertype} as the supertype of {label} would create a cycle")]
    Cycle { label: String, supertype: String },

    #[error("Label conflict on {label}: {reason}")]
    LabelConflict { label: String, reason: String },

    #[error("Label already in use: {label}")]
    LabelAlreadyInUse { label: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(Violation),

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Regex is not applicable to {label}: data type is {data_type}")]
    RegexNotApplicable { label: String, data_type: String },

    #[error("Type mismatch on {label}: expected {expected}, got {actual}")]
    TypeMismatch {
        label: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported data type: {name}")]
    UnsupportedDataType { name: String },

    #[error("Unknown concept: {id}")]
    UnknownConcept { id: String },

    #[error("Unknown label: {label}")]
    UnknownLabel { label: String },

    #[error("{label} is a {actual}, expected a {expected}")]
    KindMismatch {
        label: String,
        expected: String,
        actual: String,
    },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ConceptError {
    pub fn cycle(label: impl Into<String>, supertype: impl Into<String>) -> Self {
        Self::Cycle {
            label: label.into(),
            supertype: supertype.into(),
        }
    }

    pub fn label_conflict(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LabelConflict {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub fn label_in_use(label: impl Into<String>) -> Self {
        Self::LabelAlreadyInUse {
            label: label.into(),
        }
    }

    pub fn violation(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::ConstraintViolation(Violation::new(kind, message))
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn regex_not_applicable(label: impl Into<String>, data_type: Option<DataType>) -> Self {
        Self::RegexNotApplicable {
            label: label.into(),
            data_type: data_type.map_or_else(|| "unset".to_string(), |dt| dt.to_string()),
        }
    }

    pub fn type_mismatch(
        label: impl Into<String>,
        expected: Option<DataType>,
        actual: DataType,
    ) -> Self {
        Self::TypeMismatch {
            label: label.into(),
            expected: expected.map_or_else(|| "unset".to_string(), |dt| dt.to_string()),
            actual: actual.to_string(),
        }
    }

    pub fn unsupported_data_type(name: impl Into<String>) -> Self {
        Self::UnsupportedDataType { name: name.into() }
    }

    pub fn unknown_type(id: TypeId) -> Self {
        Self::UnknownConcept { id: id.to_string() }
    }

    pub fn unknown_thing(id: ThingId) -> Self {
        Self::UnknownConcept { id: id.to_string() }
    }

    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            label: label.into(),
        }
    }

    pub fn kind_mismatch(label: impl Into<String>, expected: SchemaKind, actual: SchemaKind) -> Self {
        Self::KindMismatch {
            label: label.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The refinement of a constraint violation, if this is one.
    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            Self::ConstraintViolation(v) => Some(v.kind),
            _ => None,
        }
    }

    /// Returns true if this is a constraint violation of the given kind.
    pub fn is_violation(&self, kind: ViolationKind) -> bool {
        self.violation_kind() == Some(kind)
    }
}

impl From<Violation> for ConceptError {
    fn from(v: Violation) -> Self {
        Self::ConstraintViolation(v)
    }
}

/// Result type for concept operations.
pub type ConceptResult<T> = Result<T, ConceptError>;
