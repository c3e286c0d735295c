//! The constraint engine and the schema-aware reads its rules share.

use ontic_core::{ConceptError, ConceptResult, SchemaKind, ThingId, TypeId, ValueKey, ViolationKind};
use ontic_graph::{Graph, Thing};
use ontic_schema::{Schema, TypeDef};

/// One ownership between instances, recorded as an implicit relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OwnershipEdge {
    /// The implicit relation instance.
    pub relation: ThingId,
    pub owner: ThingId,
    pub attribute: ThingId,
}

/// Validates mutations against a schema and graph.
///
/// Every `validate_*` method is a pure check: it reads the state it was given
/// and reports the first rule the mutation would break. The caller applies the
/// mutation only after the check passes.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEngine<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) graph: &'a Graph,
}

impl<'a> ConstraintEngine<'a> {
    pub fn new(schema: &'a Schema, graph: &'a Graph) -> Self {
        Self { schema, graph }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    // ==================== Instance Reads ====================

    /// Instances of `ty` and its subtypes, subtypes breadth first.
    pub fn instances(&self, ty: TypeId) -> impl Iterator<Item = &'a Thing> + 'a {
        let (schema, graph) = (self.schema, self.graph);
        schema.subtypes(ty).flat_map(move |sub| graph.of_type(sub))
    }

    /// Returns true if `ty` or a subtype has an instance.
    pub fn has_instances(&self, ty: TypeId) -> bool {
        self.schema
            .subtypes(ty)
            .any(|sub| self.graph.count_of_type(sub) > 0)
    }

    /// Ownerships in which `owner` holds an attribute.
    pub fn ownerships_of(&self, owner: ThingId) -> impl Iterator<Item = OwnershipEdge> + 'a {
        let (schema, graph) = (self.schema, self.graph);
        graph.relations_of(owner).filter_map(move |(relation, role)| {
            let thing = graph.get(relation)?;
            let implicit = schema.implicit_for_relation(thing.type_id)?;
            if role != implicit.owner_role {
                return None;
            }
            let attribute = thing.players_of(implicit.value_role).next()?;
            Some(OwnershipEdge {
                relation,
                owner,
                attribute,
            })
        })
    }

    /// Ownerships in which `attribute` is held.
    pub fn owners_of(&self, attribute: ThingId) -> impl Iterator<Item = OwnershipEdge> + 'a {
        let (schema, graph) = (self.schema, self.graph);
        graph.relations_of(attribute).filter_map(move |(relation, role)| {
            let thing = graph.get(relation)?;
            let implicit = schema.implicit_for_relation(thing.type_id)?;
            if role != implicit.value_role {
                return None;
            }
            let owner = thing.players_of(implicit.owner_role).next()?;
            Some(OwnershipEdge {
                relation,
                owner,
                attribute,
            })
        })
    }

    /// The ownership relation between two instances, if any.
    pub fn ownership_between(&self, owner: ThingId, attribute: ThingId) -> Option<ThingId> {
        self.ownerships_of(owner)
            .find(|edge| edge.attribute == attribute)
            .map(|edge| edge.relation)
    }

    /// Attributes held by `owner` whose type is `attribute_type` or a subtype.
    pub fn held_under(&self, owner: ThingId, attribute_type: TypeId) -> Vec<ThingId> {
        self.ownerships_of(owner)
            .filter(|edge| {
                self.graph
                    .get(edge.attribute)
                    .is_some_and(|a| self.schema.is_subtype_of(a.type_id, attribute_type))
            })
            .map(|edge| edge.attribute)
            .collect()
    }

    /// Ownerships of any attribute of `attribute_type` or a subtype equal to `value`.
    pub fn ownerships_of_value(&self, attribute_type: TypeId, value: &ValueKey) -> Vec<OwnershipEdge> {
        self.instances(attribute_type)
            .filter(|a| a.value().is_some_and(|v| v.key() == *value))
            .flat_map(|a| self.owners_of(a.id))
            .collect()
    }

    /// Interning key of an attribute instance.
    pub(crate) fn value_key(&self, attribute: ThingId) -> Option<ValueKey> {
        self.graph.get(attribute)?.value().map(|v| v.key())
    }

    // ==================== Shared Guards ====================

    pub(crate) fn thing(&self, id: ThingId) -> ConceptResult<&'a Thing> {
        self.graph.require(id)
    }

    /// Reject edits to meta types.
    pub(crate) fn not_meta(&self, def: &TypeDef) -> ConceptResult<()> {
        if self.schema.is_meta(def.id) {
            return Err(ConceptError::violation(
                ViolationKind::MetaType,
                format!("{} is a meta type and cannot be modified", def.label),
            ));
        }
        Ok(())
    }

    /// Reject direct edits to implicit types.
    pub(crate) fn not_implicit(&self, def: &TypeDef) -> ConceptResult<()> {
        if def.is_implicit() {
            return Err(ConceptError::violation(
                ViolationKind::ImplicitType,
                format!("{} is managed through has and key", def.label),
            ));
        }
        Ok(())
    }

    /// A user-editable element of `kind`.
    pub(crate) fn editable(&self, id: TypeId, kind: SchemaKind) -> ConceptResult<&'a TypeDef> {
        let def = self.schema.require_kind(id, kind)?;
        self.not_meta(def)?;
        self.not_implicit(def)?;
        Ok(def)
    }

    /// A user-editable entity, relation or attribute type.
    pub(crate) fn editable_thing_type(&self, id: TypeId) -> ConceptResult<&'a TypeDef> {
        let def = self.schema.require_thing_type(id)?;
        self.not_meta(def)?;
        self.not_implicit(def)?;
        Ok(def)
    }
}
