//! Compiled regex constraints.

use ontic_core::{ConceptError, ConceptResult};
use regex_lite::Regex;
use std::fmt;

/// A regex constraint on string attribute values.
///
/// The pattern must match the whole value, not a substring of it.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    /// Compile a pattern, reporting malformed input as `InvalidPattern`.
    pub fn compile(source: &str) -> ConceptResult<Self> {
        let invalid = |e: regex_lite::Error| ConceptError::invalid_pattern(source, e.to_string());
        // The source must stand on its own; wrapping alone could balance stray parentheses.
        Regex::new(source).map_err(invalid)?;
        let compiled = Regex::new(&format!("^(?:{})$", source)).map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }

    /// The pattern as the caller wrote it.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
