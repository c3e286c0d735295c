//! Schema element definitions.

use crate::Pattern;
use ontic_core::{DataType, Label, SchemaKind, TypeId, IMPLICIT_PREFIX, SCOPE_SEPARATOR};
use std::collections::{BTreeMap, BTreeSet};

/// How a type owns an attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Instances may hold any number of values.
    Has,
    /// Instances hold exactly one value, unique across the owning type.
    Key,
}

impl Ownership {
    pub fn is_key(&self) -> bool {
        matches!(self, Ownership::Key)
    }
}

/// Kind-specific part of a schema element.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody {
    Entity,
    Relation {
        /// Roles this relation type relates.
        relates: BTreeSet<TypeId>,
        /// Attribute type whose ownerships this relation type records.
        implicit_for: Option<TypeId>,
    },
    Attribute {
        /// Declared data type; subtypes without one inherit the nearest ancestor's.
        data_type: Option<DataType>,
        regex: Option<Pattern>,
    },
    Role,
}

impl TypeBody {
    pub fn relation() -> Self {
        TypeBody::Relation {
            relates: BTreeSet::new(),
            implicit_for: None,
        }
    }

    pub fn attribute(data_type: Option<DataType>) -> Self {
        TypeBody::Attribute {
            data_type,
            regex: None,
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            TypeBody::Entity => SchemaKind::Entity,
            TypeBody::Relation { .. } => SchemaKind::Relation,
            TypeBody::Attribute { .. } => SchemaKind::Attribute,
            TypeBody::Role => SchemaKind::Role,
        }
    }
}

/// A schema element: a thing type or a role.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub id: TypeId,
    pub label: Label,
    /// Abstract types admit no direct instances.
    pub is_abstract: bool,
    /// Roles this type declares it plays (inherited declarations excluded).
    pub plays: BTreeSet<TypeId>,
    /// Attribute types this type declares it owns (inherited declarations excluded).
    pub owns: BTreeMap<TypeId, Ownership>,
    pub body: TypeBody,
}

impl TypeDef {
    pub fn new(id: TypeId, label: impl Into<Label>, body: TypeBody) -> Self {
        Self {
            id,
            label: label.into(),
            is_abstract: false,
            plays: BTreeSet::new(),
            owns: BTreeMap::new(),
            body,
        }
    }

    pub fn kind(&self) -> SchemaKind {
        self.body.kind()
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn is_implicit(&self) -> bool {
        self.label.is_implicit()
    }

    /// Declared data type, for attribute types.
    pub fn declared_data_type(&self) -> Option<DataType> {
        match &self.body {
            TypeBody::Attribute { data_type, .. } => *data_type,
            _ => None,
        }
    }

    /// Declared regex, for attribute types.
    pub fn regex(&self) -> Option<&Pattern> {
        match &self.body {
            TypeBody::Attribute { regex, .. } => regex.as_ref(),
            _ => None,
        }
    }

    /// Roles related by this type, for relation types.
    pub fn relates(&self) -> Option<&BTreeSet<TypeId>> {
        match &self.body {
            TypeBody::Relation { relates, .. } => Some(relates),
            _ => None,
        }
    }
}

/// The implicit relation type recording ownerships of one attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitOwnership {
    /// The owned attribute type.
    pub attribute: TypeId,
    /// `@has-<label>`
    pub relation: TypeId,
    /// `@has-<label>:owner`
    pub owner_role: TypeId,
    /// `@has-<label>:value`
    pub value_role: TypeId,
}

/// Labels of the implicit types recording ownerships of `attribute`.
///
/// Roles are scoped under the relation label, so no two attribute labels
/// produce a shared implicit label.
pub fn implicit_labels(attribute: &str) -> (Label, Label, Label) {
    let relation = format!("{}has-{}", IMPLICIT_PREFIX, attribute);
    let owner = format!("{}{}owner", relation, SCOPE_SEPARATOR);
    let value = format!("{}{}value", relation, SCOPE_SEPARATOR);
    (Label::new(relation), Label::new(owner), Label::new(value))
}
