//! Labels and schema element kinds.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Prefix reserved for types the concept layer creates on its own.
pub const IMPLICIT_PREFIX: char = '@';

/// Separates an implicit relation label from the roles scoped under it.
/// User labels may not contain it.
pub const SCOPE_SEPARATOR: char = ':';

/// Human-readable, unique, mutable name of a schema element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for labels of implicit (system-managed) types.
    pub fn is_implicit(&self) -> bool {
        self.0.starts_with(IMPLICIT_PREFIX)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The closed set of schema element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Entity,
    Relation,
    Attribute,
    Role,
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Entity => "entity type",
            SchemaKind::Relation => "relation type",
            SchemaKind::Attribute => "attribute type",
            SchemaKind::Role => "role",
        }
    }

    /// Returns true for kinds whose elements can have instances.
    pub fn is_thing_type(&self) -> bool {
        !matches!(self, SchemaKind::Role)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
