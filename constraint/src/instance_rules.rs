//! Rules for instance mutations.

use crate::ConstraintEngine;
use ontic_core::{
    ConceptError, ConceptResult, SchemaKind, ThingId, TypeId, Value, Violation, ViolationKind,
};
use ontic_graph::Thing;
use ontic_schema::{OwnershipDecl, TypeDef};

impl<'a> ConstraintEngine<'a> {
    /// Check creating an instance of `ty`, which must be of `kind`.
    pub fn validate_create(&self, ty: TypeId, kind: SchemaKind) -> ConceptResult<&'a TypeDef> {
        let def = self.schema.require_kind(ty, kind)?;
        self.not_implicit(def)?;
        self.concrete(def)?;
        Ok(def)
    }

    fn concrete(&self, def: &TypeDef) -> ConceptResult<()> {
        if def.is_abstract {
            return Err(Violation::new(
                ViolationKind::AbstractType,
                format!("{} is abstract and cannot have instances", def.label),
            )
            .with_type(def.id)
            .into());
        }
        Ok(())
    }

    /// Check interning `value` as an instance of `attribute`.
    pub fn validate_put_attribute(&self, attribute: TypeId, value: &Value) -> ConceptResult<()> {
        let def = self.schema.require_kind(attribute, SchemaKind::Attribute)?;
        let expected = self.schema.effective_data_type(attribute);
        if expected != Some(value.data_type()) {
            return Err(ConceptError::type_mismatch(def.label(), expected, value.data_type()));
        }
        self.concrete(def)?;

        if let Some(s) = value.as_str() {
            if let Some((source, pattern)) = self.schema.patterns(attribute).find(|(_, p)| !p.matches(s)) {
                return Err(Violation::new(
                    ViolationKind::RegexViolation,
                    format!("{} does not match {} of {}", value, pattern, self.schema.label_of(source)),
                )
                .with_type(source)
                .into());
            }
        }
        Ok(())
    }

    fn relation(&self, id: ThingId) -> ConceptResult<&'a Thing> {
        let thing = self.thing(id)?;
        let def = self.schema.require(thing.type_id)?;
        if !thing.is_relation() {
            return Err(ConceptError::kind_mismatch(def.label(), SchemaKind::Relation, def.kind()));
        }
        self.not_implicit(def)?;
        Ok(thing)
    }

    /// Check `player` filling `role` in `relation`.
    pub fn validate_add_role_player(&self, relation: ThingId, role: TypeId, player: ThingId) -> ConceptResult<()> {
        let rel = self.relation(relation)?;
        let role_def = self.schema.require_kind(role, SchemaKind::Role)?;
        self.not_implicit(role_def)?;

        if !self.schema.relates_role(rel.type_id, role) {
            return Err(Violation::new(
                ViolationKind::RoleNotRelated,
                format!("{} does not relate {}", self.schema.label_of(rel.type_id), role_def.label),
            )
            .with_type(rel.type_id)
            .with_thing(relation)
            .into());
        }
        let player = self.thing(player)?;
        if !self.schema.plays_role(player.type_id, role) {
            return Err(Violation::new(
                ViolationKind::RoleNotPlayable,
                format!("{} does not play {}", self.schema.label_of(player.type_id), role_def.label),
            )
            .with_type(player.type_id)
            .with_thing(player.id)
            .into());
        }
        Ok(())
    }

    pub fn validate_remove_role_player(&self, relation: ThingId, role: TypeId) -> ConceptResult<()> {
        self.relation(relation)?;
        self.schema.require_kind(role, SchemaKind::Role)?;
        Ok(())
    }

    /// Check `owner` holding `attribute`, returning the declaration that allows it.
    ///
    /// Key ownerships admit one value per owner, and a value may key only one
    /// instance of the declaring type.
    pub fn validate_set_has(&self, owner: ThingId, attribute: ThingId) -> ConceptResult<OwnershipDecl> {
        let owner = self.thing(owner)?;
        let attr = self.thing(attribute)?;
        if !attr.is_attribute() {
            let def = self.schema.require(attr.type_id)?;
            return Err(ConceptError::kind_mismatch(def.label(), SchemaKind::Attribute, def.kind()));
        }

        let decl = self
            .schema
            .ownership(owner.type_id, attr.type_id)
            .ok_or_else(|| -> ConceptError {
                Violation::new(
                    ViolationKind::NotOwnable,
                    format!(
                        "{} does not own {}",
                        self.schema.label_of(owner.type_id),
                        self.schema.label_of(attr.type_id)
                    ),
                )
                .with_type(owner.type_id)
                .with_thing(owner.id)
                .into()
            })?;
        if self.ownership_between(owner.id, attr.id).is_some() {
            return Ok(decl);
        }

        let keys = self
            .schema
            .key_declarations(owner.type_id)
            .into_iter()
            .filter(|key| self.schema.is_subtype_of(attr.type_id, key.attribute));
        for key in keys {
            let violation = |message: String| -> ConceptError {
                Violation::new(ViolationKind::KeyViolation, message)
                    .with_type(key.owner)
                    .with_thing(owner.id)
                    .into()
            };
            if let Some(&held) = self.held_under(owner.id, key.attribute).first() {
                return Err(violation(format!(
                    "{} already holds the {} key {}",
                    owner.id,
                    self.schema.label_of(key.attribute),
                    held
                )));
            }
            let Some(value) = attr.value().map(Value::key) else {
                continue;
            };
            let taken = self
                .ownerships_of_value(key.attribute, &value)
                .into_iter()
                .find(|edge| {
                    edge.owner != owner.id
                        && self
                            .graph
                            .get(edge.owner)
                            .is_some_and(|other| self.schema.is_subtype_of(other.type_id, key.owner))
                });
            if let Some(edge) = taken {
                return Err(violation(format!(
                    "{} is already the {} key of {}",
                    attr.value().map_or_else(|| attr.id.to_string(), Value::to_string),
                    self.schema.label_of(key.attribute),
                    edge.owner
                )));
            }
        }
        Ok(decl)
    }

    /// Check deleting an instance.
    pub fn validate_delete_thing(&self, id: ThingId) -> ConceptResult<()> {
        let thing = self.thing(id)?;
        if self.schema.is_implicit_relation(thing.type_id) {
            return Err(Violation::new(
                ViolationKind::ImplicitType,
                format!("{} is an ownership, remove it with unset_has", id),
            )
            .with_thing(id)
            .into());
        }
        Ok(())
    }
}
