//! The closed set of value domains an attribute type may constrain to.

use crate::error::{ConceptError, ConceptResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported value domain.
///
/// Two tokens are equal only if they name the same domain; there is no
/// widening between domains (a `Long` attribute type rejects `Integer` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Date,
    Double,
    Float,
    Integer,
    Long,
    String,
}

impl DataType {
    /// Every supported data type, in canonical order.
    pub const ALL: [DataType; 7] = [
        DataType::Boolean,
        DataType::Date,
        DataType::Double,
        DataType::Float,
        DataType::Integer,
        DataType::Long,
        DataType::String,
    ];

    /// Canonical name of this data type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::String => "string",
        }
    }

    /// Look up a data type by its canonical name. Exact match only.
    pub fn from_name(name: &str) -> ConceptResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name() == name)
            .ok_or_else(|| ConceptError::unsupported_data_type(name))
    }

    /// Returns true if values of this type can be checked against a regex.
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::String)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = ConceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
