//! Committed concept state and its read accessors.

use ontic_constraint::ConstraintEngine;
use ontic_core::{ConceptError, ConceptResult, DataType, SchemaKind, ThingId, TypeId, Value};
use ontic_graph::{Graph, RolePlayer, Thing};
use ontic_schema::{Ownership, Schema, TypeDef};
use std::collections::{BTreeMap, BTreeSet};

/// Schema and instances of a keyspace at one point in time.
///
/// Read transactions share a committed state; a write transaction works on
/// its own copy until it commits.
#[derive(Debug, Clone)]
pub struct ConceptState {
    pub(crate) schema: Schema,
    pub(crate) graph: Graph,
}

impl ConceptState {
    pub(crate) fn new(schema: Schema) -> Self {
        Self {
            schema,
            graph: Graph::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) fn engine(&self) -> ConstraintEngine<'_> {
        ConstraintEngine::new(&self.schema, &self.graph)
    }

    // ==================== Schema Reads ====================

    /// ID of the element labelled `label`.
    pub fn type_id(&self, label: &str) -> ConceptResult<TypeId> {
        self.schema
            .id_of(label)
            .ok_or_else(|| ConceptError::unknown_label(label))
    }

    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.schema.get(id)
    }

    pub fn label(&self, id: TypeId) -> ConceptResult<&str> {
        Ok(self.schema.require(id)?.label())
    }

    pub fn kind(&self, id: TypeId) -> ConceptResult<SchemaKind> {
        Ok(self.schema.require(id)?.kind())
    }

    pub fn is_abstract(&self, id: TypeId) -> ConceptResult<bool> {
        Ok(self.schema.require(id)?.is_abstract)
    }

    /// `id` and its ancestors, nearest first.
    pub fn supertypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.schema.supertypes(id)
    }

    /// `id` and its descendants, breadth first.
    pub fn subtypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.schema.subtypes(id)
    }

    pub fn direct_supertype(&self, id: TypeId) -> Option<TypeId> {
        self.schema.direct_supertype(id)
    }

    pub fn direct_subtypes(&self, id: TypeId) -> &[TypeId] {
        self.schema.direct_subtypes(id)
    }

    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        self.schema.is_subtype_of(sub, sup)
    }

    /// Number of ancestors between `id` and its root.
    pub fn depth(&self, id: TypeId) -> usize {
        self.schema.depth(id)
    }

    /// Effective data type of an attribute type.
    pub fn data_type(&self, attribute: TypeId) -> ConceptResult<Option<DataType>> {
        self.schema.require_kind(attribute, SchemaKind::Attribute)?;
        Ok(self.schema.effective_data_type(attribute))
    }

    /// Regex declared on an attribute type itself.
    pub fn regex(&self, attribute: TypeId) -> ConceptResult<Option<&str>> {
        let def = self.schema.require_kind(attribute, SchemaKind::Attribute)?;
        Ok(def.regex().map(|p| p.as_str()))
    }

    /// Roles `ty` may play, inherited declarations included.
    pub fn playable_roles(&self, ty: TypeId) -> BTreeSet<TypeId> {
        self.schema.playable_roles(ty)
    }

    /// Roles `relation` relates, inherited declarations included.
    pub fn related_roles(&self, relation: TypeId) -> BTreeSet<TypeId> {
        self.schema.related_roles(relation)
    }

    /// Attribute types `ty` owns, inherited declarations included.
    pub fn owned_attributes(&self, ty: TypeId) -> BTreeMap<TypeId, Ownership> {
        self.schema.owned_attributes(ty)
    }

    /// Attribute types keying `ty`.
    pub fn keys(&self, ty: TypeId) -> BTreeSet<TypeId> {
        self.schema
            .key_declarations(ty)
            .into_iter()
            .map(|decl| decl.attribute)
            .collect()
    }

    // ==================== Instance Reads ====================

    /// Instances of `ty` and its subtypes.
    pub fn instances(&self, ty: TypeId) -> impl Iterator<Item = ThingId> + '_ {
        self.engine().instances(ty).map(|thing| thing.id)
    }

    pub fn get_thing(&self, id: ThingId) -> Option<&Thing> {
        self.graph.get(id)
    }

    /// Direct type of an instance.
    pub fn type_of(&self, id: ThingId) -> ConceptResult<TypeId> {
        Ok(self.graph.require(id)?.type_id)
    }

    /// The attribute of `attribute` holding `value`, if one exists.
    pub fn get_attribute(&self, attribute: TypeId, value: impl Into<Value>) -> Option<ThingId> {
        self.graph.find_attribute(attribute, &value.into())
    }

    pub fn attribute_value(&self, id: ThingId) -> ConceptResult<&Value> {
        let thing = self.graph.require(id)?;
        thing.value().ok_or_else(|| {
            let label = self.schema.label_of(thing.type_id);
            let kind = self.schema.get(thing.type_id).map_or(SchemaKind::Entity, TypeDef::kind);
            ConceptError::kind_mismatch(label, SchemaKind::Attribute, kind)
        })
    }

    /// Attributes held by `owner`, in ID order.
    pub fn attributes_of(&self, owner: ThingId) -> Vec<ThingId> {
        let mut held: Vec<ThingId> = self.engine().ownerships_of(owner).map(|e| e.attribute).collect();
        held.sort();
        held
    }

    /// Instances holding `attribute`, in ID order.
    pub fn owners_of(&self, attribute: ThingId) -> Vec<ThingId> {
        let mut owners: Vec<ThingId> = self.engine().owners_of(attribute).map(|e| e.owner).collect();
        owners.sort();
        owners
    }

    /// Role players of a relation.
    pub fn role_players(&self, relation: ThingId) -> ConceptResult<Vec<RolePlayer>> {
        let thing = self.graph.require(relation)?;
        Ok(thing
            .role_players()
            .map(|rps| rps.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Relations `player` plays a role in, with the role played.
    pub fn relations_of(&self, player: ThingId) -> Vec<(ThingId, TypeId)> {
        self.graph.relations_of(player).collect()
    }
}
