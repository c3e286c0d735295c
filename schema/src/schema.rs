//! The Schema - arena of schema elements with their hierarchies.

use crate::meta::{self, MetaTypes};
use crate::{ImplicitOwnership, TypeBody, TypeDef};
use log::debug;
use ontic_core::{ConceptError, ConceptResult, IdAllocator, Label, SchemaKind, TypeId};
use ontic_hierarchy::{Hierarchy, HierarchyError, Subtypes, Supertypes};
use std::collections::HashMap;

/// The schema of one keyspace.
///
/// Elements live in an arena keyed by `TypeId`. Thing types (entity, relation
/// and attribute types) share one hierarchy rooted at `thing`; roles have their
/// own rooted at `role`.
///
/// Mutators here only keep the arena, label index and hierarchies coherent;
/// semantic checks against instances belong to the constraint engine.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Element definitions by ID.
    defs: HashMap<TypeId, TypeDef>,
    /// Element ID lookup by label, shared across kinds.
    labels: HashMap<Label, TypeId>,
    /// Supertype edges of thing types.
    things: Hierarchy<TypeId>,
    /// Supertype edges of roles.
    roles: Hierarchy<TypeId>,
    meta: MetaTypes,
    /// Implicit ownership relations by owned attribute type.
    implicit_by_attribute: HashMap<TypeId, ImplicitOwnership>,
    /// Implicit ownership relations by relation type.
    implicit_by_relation: HashMap<TypeId, ImplicitOwnership>,
}

impl Schema {
    /// Create a schema holding only the meta types.
    pub fn bootstrap(ids: &dyn IdAllocator) -> ConceptResult<Self> {
        let meta = MetaTypes {
            thing: ids.type_id(),
            entity: ids.type_id(),
            relation: ids.type_id(),
            attribute: ids.type_id(),
            role: ids.type_id(),
        };

        let mut schema = Self {
            defs: HashMap::new(),
            labels: HashMap::new(),
            things: Hierarchy::new(),
            roles: Hierarchy::new(),
            meta,
            implicit_by_attribute: HashMap::new(),
            implicit_by_relation: HashMap::new(),
        };

        schema.insert_root(TypeDef::new(meta.thing, meta::THING, TypeBody::Entity))?;
        schema.insert_root(TypeDef::new(meta.role, meta::ROLE, TypeBody::Role))?;
        schema.insert(TypeDef::new(meta.entity, meta::ENTITY, TypeBody::Entity), meta.thing)?;
        schema.insert(TypeDef::new(meta.relation, meta::RELATION, TypeBody::relation()), meta.thing)?;
        schema.insert(
            TypeDef::new(meta.attribute, meta::ATTRIBUTE, TypeBody::attribute(None)),
            meta.thing,
        )?;
        for id in [meta.thing, meta.entity, meta.relation, meta.attribute] {
            schema.def_mut(id)?.is_abstract = true;
        }

        Ok(schema)
    }

    // ==================== Lookups ====================

    pub fn meta(&self) -> &MetaTypes {
        &self.meta
    }

    pub fn is_meta(&self, id: TypeId) -> bool {
        self.meta.contains(id)
    }

    /// Get an element by ID.
    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.defs.get(&id)
    }

    /// Get an element by label.
    pub fn get_by_label(&self, label: &str) -> Option<&TypeDef> {
        self.labels.get(label).and_then(|id| self.defs.get(id))
    }

    /// Get an element ID by label.
    pub fn id_of(&self, label: &str) -> Option<TypeId> {
        self.labels.get(label).copied()
    }

    /// Get an element by ID or fail with `UnknownConcept`.
    pub fn require(&self, id: TypeId) -> ConceptResult<&TypeDef> {
        self.defs.get(&id).ok_or_else(|| ConceptError::unknown_type(id))
    }

    /// Get an element of a given kind or fail with `KindMismatch`.
    pub fn require_kind(&self, id: TypeId, kind: SchemaKind) -> ConceptResult<&TypeDef> {
        let def = self.require(id)?;
        if def.kind() != kind {
            return Err(ConceptError::kind_mismatch(def.label(), kind, def.kind()));
        }
        Ok(def)
    }

    /// Get a thing type (anything but a role).
    pub fn require_thing_type(&self, id: TypeId) -> ConceptResult<&TypeDef> {
        let def = self.require(id)?;
        if !def.kind().is_thing_type() {
            return Err(ConceptError::kind_mismatch(
                def.label(),
                SchemaKind::Entity,
                def.kind(),
            ));
        }
        Ok(def)
    }

    /// Label of an element, for messages.
    pub fn label_of(&self, id: TypeId) -> String {
        self.defs
            .get(&id)
            .map(|d| d.label.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// All elements, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &TypeDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    // ==================== Hierarchy Queries ====================

    fn hierarchy_of(&self, id: TypeId) -> &Hierarchy<TypeId> {
        if self.roles.contains(id) {
            &self.roles
        } else {
            &self.things
        }
    }

    /// The element and its ancestors, nearest first.
    pub fn supertypes(&self, id: TypeId) -> Supertypes<'_, TypeId> {
        self.hierarchy_of(id).supertypes(id)
    }

    /// The element and all its descendants, breadth first.
    pub fn subtypes(&self, id: TypeId) -> Subtypes<'_, TypeId> {
        self.hierarchy_of(id).subtypes(id)
    }

    pub fn direct_supertype(&self, id: TypeId) -> Option<TypeId> {
        self.hierarchy_of(id).parent(id)
    }

    pub fn direct_subtypes(&self, id: TypeId) -> &[TypeId] {
        self.hierarchy_of(id).children(id)
    }

    /// Returns true if `sub` is `sup` or a descendant of it.
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        self.hierarchy_of(sub).is_subtype_of(sub, sup)
    }

    /// Number of ancestors between the element and its root.
    pub fn depth(&self, id: TypeId) -> usize {
        self.hierarchy_of(id).depth(id)
    }

    // ==================== Implicit Ownership Relations ====================

    /// The implicit relation recording ownerships of an attribute type.
    pub fn implicit_for_attribute(&self, attribute: TypeId) -> Option<&ImplicitOwnership> {
        self.implicit_by_attribute.get(&attribute)
    }

    /// The ownership recorded by an implicit relation type.
    pub fn implicit_for_relation(&self, relation: TypeId) -> Option<&ImplicitOwnership> {
        self.implicit_by_relation.get(&relation)
    }

    /// Returns true if `role` is the owner role of an implicit relation.
    pub fn is_owner_role(&self, role: TypeId) -> bool {
        self.implicit_by_attribute
            .values()
            .any(|imp| imp.owner_role == role)
    }

    pub fn register_implicit(&mut self, implicit: ImplicitOwnership) {
        self.implicit_by_attribute
            .insert(implicit.attribute, implicit);
        self.implicit_by_relation.insert(implicit.relation, implicit);
    }

    pub fn unregister_implicit(&mut self, attribute: TypeId) -> Option<ImplicitOwnership> {
        let implicit = self.implicit_by_attribute.remove(&attribute)?;
        self.implicit_by_relation.remove(&implicit.relation);
        Some(implicit)
    }

    // ==================== Mutators ====================

    fn insert_root(&mut self, def: TypeDef) -> ConceptResult<()> {
        self.check_label_free(&def.label, None)?;
        let result = match def.kind() {
            SchemaKind::Role => self.roles.insert_root(def.id),
            _ => self.things.insert_root(def.id),
        };
        result.map_err(|e| self.hierarchy_error(e))?;
        self.labels.insert(def.label.clone(), def.id);
        self.defs.insert(def.id, def);
        Ok(())
    }

    /// Add an element under `supertype`.
    pub fn insert(&mut self, def: TypeDef, supertype: TypeId) -> ConceptResult<()> {
        self.check_label_free(&def.label, None)?;
        let result = match def.kind() {
            SchemaKind::Role => self.roles.insert(def.id, supertype),
            _ => self.things.insert(def.id, supertype),
        };
        result.map_err(|e| self.hierarchy_error(e))?;
        debug!("defined {} {} under {}", def.kind(), def.label, self.label_of(supertype));
        self.labels.insert(def.label.clone(), def.id);
        self.defs.insert(def.id, def);
        Ok(())
    }

    /// Mutable access to an element.
    pub fn def_mut(&mut self, id: TypeId) -> ConceptResult<&mut TypeDef> {
        self.defs
            .get_mut(&id)
            .ok_or_else(|| ConceptError::unknown_type(id))
    }

    /// Fail with `LabelAlreadyInUse` if a live element other than `owner` holds `label`.
    pub fn check_label_free(&self, label: &Label, owner: Option<TypeId>) -> ConceptResult<()> {
        match self.labels.get(label) {
            Some(&holder) if Some(holder) != owner => Err(ConceptError::label_in_use(label.as_str())),
            _ => Ok(()),
        }
    }

    /// Give an element a new label.
    pub fn relabel(&mut self, id: TypeId, label: Label) -> ConceptResult<()> {
        self.check_label_free(&label, Some(id))?;
        let def = self.def_mut(id)?;
        let old = std::mem::replace(&mut def.label, label.clone());
        self.labels.remove(&old);
        self.labels.insert(label, id);
        Ok(())
    }

    /// Move an element under a new direct supertype, returning the old one.
    pub fn reparent(&mut self, id: TypeId, supertype: TypeId) -> ConceptResult<Option<TypeId>> {
        let result = if self.roles.contains(id) {
            self.roles.reparent(id, supertype)
        } else {
            self.things.reparent(id, supertype)
        };
        result.map_err(|e| self.hierarchy_error(e))
    }

    /// Remove a leaf element.
    pub fn remove(&mut self, id: TypeId) -> ConceptResult<TypeDef> {
        let result = if self.roles.contains(id) {
            self.roles.remove(id)
        } else {
            self.things.remove(id)
        };
        result.map_err(|e| self.hierarchy_error(e))?;
        let def = self
            .defs
            .remove(&id)
            .ok_or_else(|| ConceptError::unknown_type(id))?;
        self.labels.remove(&def.label);
        Ok(def)
    }

    fn hierarchy_error(&self, error: HierarchyError<TypeId>) -> ConceptError {
        match error {
            HierarchyError::UnknownNode(id) => ConceptError::unknown_type(id),
            HierarchyError::DuplicateNode(id) => ConceptError::label_in_use(self.label_of(id)),
            HierarchyError::Cycle { node, parent } => {
                ConceptError::cycle(self.label_of(node), self.label_of(parent))
            }
            HierarchyError::HasChildren(id) => ConceptError::violation(
                ontic_core::ViolationKind::HasSubtypes,
                format!("{} still has subtypes", self.label_of(id)),
            ),
            HierarchyError::Root(id) => ConceptError::violation(
                ontic_core::ViolationKind::MetaType,
                format!("{} is a root type", self.label_of(id)),
            ),
        }
    }
}
