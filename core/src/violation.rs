//! Constraint violation types.

use crate::{ThingId, TypeId};
use std::fmt;

/// Refinement of a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The data type of an attribute type can no longer change.
    ImmutableDataType,
    /// A value does not match the regex of its attribute type.
    RegexViolation,
    /// A declaration cannot be removed while instances rely on it.
    InUseConstraint,
    /// An abstract type cannot have direct instances.
    AbstractType,
    /// A key ownership is missing, duplicated, or not unique.
    KeyViolation,
    /// The owner's type does not own the attribute's type.
    NotOwnable,
    /// The player's type does not play the role.
    RoleNotPlayable,
    /// The relation's type does not relate the role.
    RoleNotRelated,
    /// The type still has instances.
    HasInstances,
    /// The type still has subtypes.
    HasSubtypes,
    /// Meta types cannot be modified.
    MetaType,
    /// Implicit types are managed through `has`/`key` only.
    ImplicitType,
}

impl ViolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViolationKind::ImmutableDataType => "immutable data type",
            ViolationKind::RegexViolation => "regex violation",
            ViolationKind::InUseConstraint => "constraint in use",
            ViolationKind::AbstractType => "abstract type",
            ViolationKind::KeyViolation => "key violation",
            ViolationKind::NotOwnable => "attribute not ownable",
            ViolationKind::RoleNotPlayable => "role not playable",
            ViolationKind::RoleNotRelated => "role not related",
            ViolationKind::HasInstances => "type has instances",
            ViolationKind::HasSubtypes => "type has subtypes",
            ViolationKind::MetaType => "meta type",
            ViolationKind::ImplicitType => "implicit type",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// What kind of constraint was violated.
    pub kind: ViolationKind,
    /// Human-readable message describing the violation.
    pub message: String,
    /// Schema element the violated constraint belongs to, if any.
    pub type_id: Option<TypeId>,
    /// Instance involved in the violation, if any.
    pub thing_id: Option<ThingId>,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            type_id: None,
            thing_id: None,
        }
    }

    /// Add a schema element to the violation context.
    pub fn with_type(mut self, type_id: TypeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Add an instance to the violation context.
    pub fn with_thing(mut self, thing_id: ThingId) -> Self {
        self.thing_id = Some(thing_id);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Collection of violations.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn all(&self) -> &[Violation] {
        &self.violations
    }

    /// Take the first violation, if any.
    pub fn into_first(self) -> Option<Violation> {
        self.violations.into_iter().next()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
