//! Meta types every schema starts with.

use ontic_core::{SchemaKind, TypeId};

/// Root of every entity, relation and attribute type.
pub const THING: &str = "thing";
/// Root of user entity types.
pub const ENTITY: &str = "entity";
/// Root of user relation types.
pub const RELATION: &str = "relation";
/// Root of user attribute types.
pub const ATTRIBUTE: &str = "attribute";
/// Root of the role hierarchy.
pub const ROLE: &str = "role";

/// Identifiers of the meta types of one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaTypes {
    pub thing: TypeId,
    pub entity: TypeId,
    pub relation: TypeId,
    pub attribute: TypeId,
    pub role: TypeId,
}

impl MetaTypes {
    /// The meta type new types of `kind` are created under.
    pub fn of_kind(&self, kind: SchemaKind) -> TypeId {
        match kind {
            SchemaKind::Entity => self.entity,
            SchemaKind::Relation => self.relation,
            SchemaKind::Attribute => self.attribute,
            SchemaKind::Role => self.role,
        }
    }

    pub fn contains(&self, id: TypeId) -> bool {
        [self.thing, self.entity, self.relation, self.attribute, self.role].contains(&id)
    }
}
