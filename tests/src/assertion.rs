//! Assertions on the outcome of a step.

use ontic_core::{ConceptError, ViolationKind};
use regex_lite::Regex;

use crate::error::{ScenarioError, ScenarioResult};

/// What a step is expected to produce.
#[derive(Debug, Clone, Default)]
pub struct Assertion {
    /// Expect the step to fail.
    pub fails: bool,
    /// Expected violation kind.
    pub violation: Option<ViolationKind>,
    /// Expected error variant, by name.
    pub variant: Option<&'static str>,
    /// Regex the error message must contain a match of.
    pub error_pattern: Option<String>,
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// The step commits.
    pub fn ok(self) -> Self {
        Self {
            fails: false,
            ..self
        }
    }

    /// The step fails with a constraint violation of `kind`.
    pub fn violation(mut self, kind: ViolationKind) -> Self {
        self.fails = true;
        self.violation = Some(kind);
        self
    }

    /// The step fails with the error variant named `variant`, e.g. `"Cycle"`.
    pub fn error(mut self, variant: &'static str) -> Self {
        self.fails = true;
        self.variant = Some(variant);
        self
    }

    /// The step fails with a message matching `pattern`.
    pub fn error_matching(mut self, pattern: impl Into<String>) -> Self {
        self.fails = true;
        self.error_pattern = Some(pattern.into());
        self
    }

    fn expected(&self) -> String {
        let mut parts = Vec::new();
        if let Some(kind) = self.violation {
            parts.push(format!("violation {}", kind));
        }
        if let Some(variant) = self.variant {
            parts.push(format!("error {}", variant));
        }
        if let Some(pattern) = &self.error_pattern {
            parts.push(format!("message matching /{}/", pattern));
        }
        if parts.is_empty() {
            "an error".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Check `result` against the assertion.
    pub fn verify(&self, step: &str, result: &Result<(), ConceptError>) -> ScenarioResult<()> {
        let err = match (result, self.fails) {
            (Ok(()), false) => return Ok(()),
            (Ok(()), true) => return Err(ScenarioError::unexpected_success(step, self.expected())),
            (Err(e), false) => return Err(ScenarioError::unexpected_error(step, e.to_string())),
            (Err(e), true) => e,
        };

        let actual = err.to_string();
        let wrong = || ScenarioError::wrong_error(step, self.expected(), actual.clone());

        if let Some(kind) = self.violation {
            if !err.is_violation(kind) {
                return Err(wrong());
            }
        }
        if let Some(variant) = self.variant {
            if variant_name(err) != variant {
                return Err(wrong());
            }
        }
        if let Some(pattern) = &self.error_pattern {
            let re = Regex::new(pattern).map_err(|e| ScenarioError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            if !re.is_match(&actual) {
                return Err(wrong());
            }
        }
        Ok(())
    }
}

fn variant_name(err: &ConceptError) -> &'static str {
    match err {
        ConceptError::Cycle { .. } => "Cycle",
        ConceptError::LabelConflict { .. } => "LabelConflict",
        ConceptError::LabelAlreadyInUse { .. } => "LabelAlreadyInUse",
        ConceptError::ConstraintViolation(_) => "ConstraintViolation",
        ConceptError::InvalidPattern { .. } => "InvalidPattern",
        ConceptError::RegexNotApplicable { .. } => "RegexNotApplicable",
        ConceptError::TypeMismatch { .. } => "TypeMismatch",
        ConceptError::UnsupportedDataType { .. } => "UnsupportedDataType",
        ConceptError::UnknownConcept { .. } => "UnknownConcept",
        ConceptError::UnknownLabel { .. } => "UnknownLabel",
        ConceptError::KindMismatch { .. } => "KindMismatch",
        ConceptError::Persistence { .. } => "Persistence",
        ConceptError::InvalidConfig { .. } => "InvalidConfig",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontic_core::DataType;

    #[test]
    fn test_ok_assertion() {
        let a = Assertion::new().ok();
        assert!(a.verify("s", &Ok(())).is_ok());
        assert!(matches!(
            a.verify("s", &Err(ConceptError::label_in_use("x"))),
            Err(ScenarioError::UnexpectedError { .. })
        ));
    }

    #[test]
    fn test_violation_assertion() {
        let a = Assertion::new().violation(ViolationKind::KeyViolation);
        let key = ConceptError::violation(ViolationKind::KeyViolation, "duplicate");
        let regex = ConceptError::violation(ViolationKind::RegexViolation, "bad");

        assert!(a.verify("s", &Err(key)).is_ok());
        assert!(matches!(a.verify("s", &Err(regex)), Err(ScenarioError::WrongError { .. })));
        assert!(matches!(a.verify("s", &Ok(())), Err(ScenarioError::UnexpectedSuccess { .. })));
    }

    #[test]
    fn test_variant_and_pattern_assertion() {
        let a = Assertion::new().error("TypeMismatch").error_matching("expected long");
        let err = ConceptError::type_mismatch("age", Some(DataType::Long), DataType::String);
        assert!(a.verify("s", &Err(err)).is_ok());
    }
}
