//! Rules for schema mutations.

use crate::ConstraintEngine;
use log::trace;
use ontic_core::{
    ConceptError, ConceptResult, DataType, Label, SchemaKind, ThingId, TypeId, Violation,
    ValueKey, ViolationKind, IMPLICIT_PREFIX, SCOPE_SEPARATOR,
};
use ontic_graph::ThingBody;
use ontic_schema::{implicit_labels, Pattern, TypeDef};
use std::collections::HashMap;

fn in_use(message: String, ty: TypeId, thing: ThingId) -> ConceptError {
    Violation::new(ViolationKind::InUseConstraint, message)
        .with_type(ty)
        .with_thing(thing)
        .into()
}

impl<'a> ConstraintEngine<'a> {
    // ==================== Labels & Hierarchy ====================

    /// Check a label a user wants to assign.
    pub fn validate_label(&self, label: &str, max_len: usize) -> ConceptResult<()> {
        if label.is_empty() {
            return Err(ConceptError::label_conflict(label, "labels cannot be empty"));
        }
        if label.starts_with(IMPLICIT_PREFIX) {
            return Err(ConceptError::label_conflict(
                label,
                format!("labels starting with {} are reserved", IMPLICIT_PREFIX),
            ));
        }
        if label.contains(SCOPE_SEPARATOR) {
            return Err(ConceptError::label_conflict(
                label,
                format!("labels cannot contain {}", SCOPE_SEPARATOR),
            ));
        }
        if label.chars().count() > max_len {
            return Err(ConceptError::label_conflict(
                label,
                format!("labels are limited to {} characters", max_len),
            ));
        }
        Ok(())
    }

    /// Check a new element of `kind` labelled `label` under `supertype`.
    pub fn validate_new_type(
        &self,
        label: &str,
        kind: SchemaKind,
        supertype: TypeId,
        max_len: usize,
    ) -> ConceptResult<()> {
        self.validate_label(label, max_len)?;
        self.schema.check_label_free(&Label::new(label), None)?;
        self.validate_supertype_kind(label, kind, supertype)?;
        Ok(())
    }

    fn validate_supertype_kind(
        &self,
        label: &str,
        kind: SchemaKind,
        supertype: TypeId,
    ) -> ConceptResult<&'a TypeDef> {
        let sup = self.schema.require(supertype)?;
        if sup.kind() != kind || supertype == self.schema.meta().thing {
            return Err(ConceptError::label_conflict(
                label,
                format!("{} cannot be the supertype of a {}", sup.label, kind),
            ));
        }
        self.not_implicit(sup)?;
        Ok(sup)
    }

    /// Check moving `ty` under `supertype`.
    ///
    /// Beyond the hierarchy rules, every instance under `ty` must still
    /// conform once it inherits from the new ancestors.
    pub fn validate_set_supertype(&self, ty: TypeId, supertype: TypeId) -> ConceptResult<()> {
        let def = self.schema.require(ty)?;
        self.not_meta(def)?;
        self.not_implicit(def)?;
        self.validate_supertype_kind(def.label(), def.kind(), supertype)?;

        if self.schema.direct_supertype(ty) == Some(supertype) {
            return Ok(());
        }
        if self.schema.is_subtype_of(supertype, ty) {
            return Err(ConceptError::cycle(
                def.label(),
                self.schema.label_of(supertype),
            ));
        }

        let mut candidate = self.schema.clone();
        candidate.reparent(ty, supertype)?;
        ConstraintEngine::new(&candidate, self.graph).check_conformance(ty)
    }

    /// Check that the subtree under `ty` and its instances satisfy the schema.
    pub(crate) fn check_conformance(&self, ty: TypeId) -> ConceptResult<()> {
        for sub in self.schema.subtypes(ty) {
            let Some(declared) = self.schema.get(sub).and_then(TypeDef::declared_data_type) else {
                continue;
            };
            let inherited = self
                .schema
                .direct_supertype(sub)
                .and_then(|sup| self.schema.effective_data_type(sup));
            if inherited.is_some_and(|dt| dt != declared) {
                return Err(Violation::new(
                    ViolationKind::ImmutableDataType,
                    format!(
                        "{} is {} but would inherit {}",
                        self.schema.label_of(sub),
                        declared,
                        inherited.map_or_else(String::new, |dt| dt.to_string())
                    ),
                )
                .with_type(sub)
                .into());
            }
        }

        for thing in self.instances(ty) {
            trace!("checking conformance of {}", thing.id);
            let label = self.schema.label_of(thing.type_id);
            match &thing.body {
                ThingBody::Attribute { value } => {
                    let effective = self.schema.effective_data_type(thing.type_id);
                    if effective != Some(value.data_type()) {
                        return Err(Violation::new(
                            ViolationKind::ImmutableDataType,
                            format!("{} holds a {} value", label, value.data_type()),
                        )
                        .with_type(thing.type_id)
                        .with_thing(thing.id)
                        .into());
                    }
                    if let Some(s) = value.as_str() {
                        if let Some((_, pattern)) = self.schema.patterns(thing.type_id).find(|(_, p)| !p.matches(s)) {
                            return Err(Violation::new(
                                ViolationKind::RegexViolation,
                                format!("{} does not match {}", value, pattern),
                            )
                            .with_type(thing.type_id)
                            .with_thing(thing.id)
                            .into());
                        }
                    }
                }
                ThingBody::Relation { role_players } if !self.schema.is_implicit_relation(thing.type_id) => {
                    for rp in role_players {
                        if !self.schema.relates_role(thing.type_id, rp.role) {
                            return Err(in_use(
                                format!("{} relates {} in {}", label, self.schema.label_of(rp.role), thing.id),
                                thing.type_id,
                                thing.id,
                            ));
                        }
                    }
                }
                _ => {}
            }

            for (relation, role) in self.graph.relations_of(thing.id) {
                let implicit = self
                    .graph
                    .get(relation)
                    .and_then(|rel| self.schema.implicit_for_relation(rel.type_id));
                if implicit.is_none() && !self.schema.plays_role(thing.type_id, role) {
                    return Err(in_use(
                        format!("{} plays {} in {}", thing.id, self.schema.label_of(role), relation),
                        thing.type_id,
                        thing.id,
                    ));
                }
            }
            for edge in self.ownerships_of(thing.id).chain(self.owners_of(thing.id)) {
                let owner = self.thing(edge.owner)?;
                let attribute = self.thing(edge.attribute)?;
                if self.schema.ownership(owner.type_id, attribute.type_id).is_none() {
                    return Err(in_use(
                        format!("{} holds {}", owner.id, attribute.id),
                        thing.type_id,
                        thing.id,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Check relabelling `ty`.
    pub fn validate_set_label(&self, ty: TypeId, label: &str, max_len: usize) -> ConceptResult<()> {
        let def = self.schema.require(ty)?;
        self.not_meta(def)?;
        self.not_implicit(def)?;
        self.validate_label(label, max_len)?;
        self.schema.check_label_free(&Label::new(label), Some(ty))?;

        if let Some(implicit) = self.schema.implicit_for_attribute(ty) {
            let (relation, owner, value) = implicit_labels(label);
            self.schema.check_label_free(&relation, Some(implicit.relation))?;
            self.schema.check_label_free(&owner, Some(implicit.owner_role))?;
            self.schema.check_label_free(&value, Some(implicit.value_role))?;
        }
        Ok(())
    }

    /// Check changing whether `ty` is abstract.
    pub fn validate_set_abstract(&self, ty: TypeId, is_abstract: bool) -> ConceptResult<()> {
        let def = self.editable_thing_type(ty)?;
        if is_abstract && !def.is_abstract && self.graph.count_of_type(ty) > 0 {
            return Err(Violation::new(
                ViolationKind::HasInstances,
                format!("{} has instances and cannot become abstract", def.label),
            )
            .with_type(ty)
            .into());
        }
        Ok(())
    }

    // ==================== Attribute Types ====================

    /// Check setting the data type of `attribute`.
    pub fn validate_set_data_type(&self, attribute: TypeId, data_type: DataType) -> ConceptResult<()> {
        let def = self.editable(attribute, SchemaKind::Attribute)?;
        let immutable = |message: String| -> ConceptError {
            Violation::new(ViolationKind::ImmutableDataType, message)
                .with_type(attribute)
                .into()
        };

        if self.has_instances(attribute) {
            return Err(immutable(format!("{} already has instances", def.label)));
        }
        if def.declared_data_type() == Some(data_type) {
            return Ok(());
        }
        if let Some(current) = def.declared_data_type() {
            return Err(immutable(format!("{} is already {}", def.label, current)));
        }
        let related = self
            .schema
            .supertypes(attribute)
            .chain(self.schema.subtypes(attribute))
            .filter_map(|id| self.schema.get(id));
        for other in related {
            if let Some(dt) = other.declared_data_type().filter(|dt| *dt != data_type) {
                return Err(immutable(format!("{} is related to {} of type {}", def.label, other.label, dt)));
            }
        }
        if !data_type.is_string() {
            let constrained = self.schema.patterns(attribute).next().is_some()
                || self
                    .schema
                    .subtypes(attribute)
                    .any(|id| self.schema.get(id).is_some_and(|d| d.regex().is_some()));
            if constrained {
                return Err(ConceptError::regex_not_applicable(def.label(), Some(data_type)));
            }
        }
        Ok(())
    }

    /// Check constraining `attribute` with `pattern`, returning it compiled.
    pub fn validate_set_regex(&self, attribute: TypeId, pattern: &str) -> ConceptResult<Pattern> {
        let def = self.editable(attribute, SchemaKind::Attribute)?;
        let data_type = self.schema.effective_data_type(attribute);
        if data_type != Some(DataType::String) {
            return Err(ConceptError::regex_not_applicable(def.label(), data_type));
        }
        let pattern = Pattern::compile(pattern)?;

        for thing in self.instances(attribute) {
            let Some(value) = thing.value().and_then(|v| v.as_str()) else {
                continue;
            };
            if !pattern.matches(value) {
                return Err(Violation::new(
                    ViolationKind::RegexViolation,
                    format!("{} of {} does not match {}", value, def.label, pattern),
                )
                .with_type(attribute)
                .with_thing(thing.id)
                .into());
            }
        }
        Ok(pattern)
    }

    /// Removing a regex only loosens the schema.
    pub fn validate_unset_regex(&self, attribute: TypeId) -> ConceptResult<()> {
        self.editable(attribute, SchemaKind::Attribute).map(|_| ())
    }

    // ==================== Plays & Relates ====================

    pub fn validate_plays(&self, ty: TypeId, role: TypeId) -> ConceptResult<()> {
        self.editable_thing_type(ty)?;
        self.editable(role, SchemaKind::Role)?;
        Ok(())
    }

    /// Check withdrawing the declaration that `ty` plays `role`.
    pub fn validate_unplay(&self, ty: TypeId, role: TypeId) -> ConceptResult<()> {
        let def = self.editable_thing_type(ty)?;
        self.editable(role, SchemaKind::Role)?;
        if !def.plays.contains(&role) {
            return Ok(());
        }

        for thing in self.instances(ty) {
            let plays = self.graph.relations_of(thing.id).any(|(_, r)| r == role);
            if plays && !self.schema.plays_role_without(thing.type_id, role, Some((ty, role))) {
                return Err(in_use(
                    format!(
                        "{} still plays {} through {}",
                        thing.id,
                        self.schema.label_of(role),
                        def.label
                    ),
                    ty,
                    thing.id,
                ));
            }
        }
        Ok(())
    }

    pub fn validate_relates(&self, relation: TypeId, role: TypeId) -> ConceptResult<()> {
        self.editable(relation, SchemaKind::Relation)?;
        self.editable(role, SchemaKind::Role)?;
        Ok(())
    }

    /// Check withdrawing the declaration that `relation` relates `role`.
    pub fn validate_unrelate(&self, relation: TypeId, role: TypeId) -> ConceptResult<()> {
        let def = self.editable(relation, SchemaKind::Relation)?;
        self.editable(role, SchemaKind::Role)?;
        if !def.relates().is_some_and(|r| r.contains(&role)) {
            return Ok(());
        }

        for rel in self.instances(relation) {
            let filled = rel.players_of(role).next().is_some();
            if filled && !self.schema.relates_role_without(rel.type_id, role, Some((relation, role))) {
                return Err(in_use(
                    format!("{} still fills {}", rel.id, self.schema.label_of(role)),
                    relation,
                    rel.id,
                ));
            }
        }
        Ok(())
    }

    // ==================== Has & Key ====================

    pub fn validate_has(&self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.editable_thing_type(ty)?;
        self.editable(attribute, SchemaKind::Attribute)?;
        Ok(())
    }

    /// Check withdrawing `has` (and any `key`) of `attribute` from `ty`.
    pub fn validate_unhas(&self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        let def = self.editable_thing_type(ty)?;
        self.editable(attribute, SchemaKind::Attribute)?;
        if !def.owns.contains_key(&attribute) {
            return Ok(());
        }

        for owner in self.instances(ty) {
            for edge in self.ownerships_of(owner.id) {
                let held = self.thing(edge.attribute)?;
                if !self.schema.is_subtype_of(held.type_id, attribute) {
                    continue;
                }
                let remaining =
                    self.schema
                        .ownership_without(owner.type_id, held.type_id, Some((ty, attribute)));
                if remaining.is_none() {
                    return Err(in_use(
                        format!("{} still holds {} through {}", owner.id, held.id, def.label),
                        ty,
                        owner.id,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Check declaring `attribute` a key of `ty`.
    ///
    /// Existing instances must already hold exactly one value each, and no
    /// value may be shared.
    pub fn validate_key(&self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        let def = self.editable_thing_type(ty)?;
        let attr_def = self.editable(attribute, SchemaKind::Attribute)?;
        if def.owns.get(&attribute).is_some_and(|o| o.is_key()) {
            return Ok(());
        }

        let mut keyed: HashMap<ValueKey, ThingId> = HashMap::new();
        for owner in self.instances(ty) {
            let held = self.held_under(owner.id, attribute);
            let violation = |message: String| -> ConceptError {
                Violation::new(ViolationKind::KeyViolation, message)
                    .with_type(ty)
                    .with_thing(owner.id)
                    .into()
            };
            match held.as_slice() {
                [value] => {
                    let Some(key) = self.value_key(*value) else {
                        continue;
                    };
                    if let Some(other) = keyed.insert(key, owner.id) {
                        return Err(violation(format!(
                            "{} and {} share the {} {}",
                            other, owner.id, attr_def.label, value
                        )));
                    }
                }
                _ => {
                    return Err(violation(format!(
                        "{} holds {} {} values, a key needs exactly one",
                        owner.id,
                        held.len(),
                        attr_def.label
                    )))
                }
            }
        }
        Ok(())
    }

    /// Dropping a key keeps the `has` and never breaks an instance.
    pub fn validate_unkey(&self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.editable_thing_type(ty)?;
        self.editable(attribute, SchemaKind::Attribute)?;
        Ok(())
    }

    // ==================== Deletion ====================

    /// Check deleting `ty`.
    pub fn validate_delete_type(&self, ty: TypeId) -> ConceptResult<()> {
        let def = self.schema.require(ty)?;
        self.not_meta(def)?;
        self.not_implicit(def)?;

        if !self.schema.direct_subtypes(ty).is_empty() {
            return Err(Violation::new(
                ViolationKind::HasSubtypes,
                format!("{} still has subtypes", def.label),
            )
            .with_type(ty)
            .into());
        }
        if self.graph.count_of_type(ty) > 0 {
            return Err(Violation::new(
                ViolationKind::HasInstances,
                format!("{} still has instances", def.label),
            )
            .with_type(ty)
            .into());
        }

        if def.kind() == SchemaKind::Role {
            let relating = self
                .schema
                .all()
                .filter(|d| d.relates().is_some_and(|r| r.contains(&ty)));
            for relation in relating {
                if let Some(rel) = self.instances(relation.id).find(|rel| rel.players_of(ty).next().is_some()) {
                    return Err(in_use(
                        format!("{} still fills {}", rel.id, def.label),
                        ty,
                        rel.id,
                    ));
                }
            }
        }
        Ok(())
    }
}
