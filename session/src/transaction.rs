//! Read and write transactions.

use crate::session::Session;
use crate::state::ConceptState;
use log::{debug, warn};
use ontic_core::{
    ConceptError, ConceptResult, DataType, Label, SchemaKind, ThingId, TypeId, Value,
};
use ontic_graph::Thing;
use ontic_journal::{CommitContext, Mutation, TxnId};
use ontic_schema::{implicit_labels, ImplicitOwnership, Ownership, TypeBody, TypeDef};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, MutexGuard};

/// A read-only view of one committed state.
///
/// Never blocks the writer and never sees its uncommitted changes.
#[derive(Debug, Clone)]
pub struct ReadTransaction {
    state: Arc<ConceptState>,
}

impl ReadTransaction {
    pub(crate) fn new(state: Arc<ConceptState>) -> Self {
        Self { state }
    }
}

impl Deref for ReadTransaction {
    type Target = ConceptState;

    fn deref(&self) -> &ConceptState {
        &self.state
    }
}

/// Saved position within a write transaction.
#[derive(Debug)]
struct Savepoint {
    state: ConceptState,
    applied: usize,
}

/// The single write transaction of a session.
///
/// Mutations apply to a private copy of the committed state, each one
/// validated before it changes anything. `commit` publishes the copy;
/// `rollback` or dropping the transaction discards it.
#[derive(Debug)]
pub struct WriteTransaction<'s> {
    session: &'s Session,
    _writer: MutexGuard<'s, ()>,
    txn_id: TxnId,
    working: ConceptState,
    /// Applied mutations, in order.
    mutations: Vec<Mutation>,
    savepoints: HashMap<String, Savepoint>,
}

impl Deref for WriteTransaction<'_> {
    type Target = ConceptState;

    fn deref(&self) -> &ConceptState {
        &self.working
    }
}

impl<'s> WriteTransaction<'s> {
    pub(crate) fn new(session: &'s Session, writer: MutexGuard<'s, ()>, txn_id: TxnId) -> Self {
        let working = session.snapshot().as_ref().clone();
        debug!("began transaction {}", txn_id);
        Self {
            session,
            _writer: writer,
            txn_id,
            working,
            mutations: Vec::new(),
            savepoints: HashMap::new(),
        }
    }

    pub fn id(&self) -> TxnId {
        self.txn_id
    }

    /// Mutations applied so far.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    fn record(&mut self, mutation: Mutation) {
        debug!("txn {}: {:?}", self.txn_id, mutation);
        self.mutations.push(mutation);
    }

    fn max_label_len(&self) -> usize {
        self.session.config().max_label_len
    }

    // ==================== Commit ====================

    /// Validate, persist and publish the transaction.
    ///
    /// On any failure the transaction is discarded and the committed state
    /// is left as it was.
    pub fn commit(self) -> ConceptResult<TxnId> {
        let Self {
            session,
            _writer: writer,
            txn_id,
            working,
            mutations,
            ..
        } = self;

        if session.config().validate_on_commit {
            if let Some(violation) = working.engine().validate_commit().into_first() {
                warn!("transaction {} rejected at commit: {}", txn_id, violation);
                return Err(violation.into());
            }
        }

        if let Some(hook) = session.hook() {
            let ctx = CommitContext {
                txn_id,
                mutations: &mutations,
                schema: &working.schema,
                graph: &working.graph,
            };
            if let Err(e) = hook.on_commit(&ctx) {
                warn!("transaction {} not persisted: {}", txn_id, e);
                return Err(e.into());
            }
        }

        session.publish(working);
        debug!("committed transaction {} ({} mutations)", txn_id, mutations.len());
        drop(writer);
        Ok(txn_id)
    }

    /// Discard the transaction.
    pub fn rollback(self) {
        debug!("rolled back transaction {}", self.txn_id);
    }

    /// Remember the current state under `name`, replacing any savepoint of that name.
    pub fn savepoint(&mut self, name: impl Into<String>) {
        let savepoint = Savepoint {
            state: self.working.clone(),
            applied: self.mutations.len(),
        };
        self.savepoints.insert(name.into(), savepoint);
    }

    /// Undo every mutation since the savepoint `name`, keeping the savepoint.
    ///
    /// Identifiers handed out since then are not reused.
    pub fn rollback_to(&mut self, name: &str) -> ConceptResult<()> {
        let savepoint = self
            .savepoints
            .get(name)
            .ok_or_else(|| ConceptError::unknown_label(name))?;
        self.working = savepoint.state.clone();
        self.mutations.truncate(savepoint.applied);
        let applied = savepoint.applied;
        self.savepoints.retain(|_, sp| sp.applied <= applied);
        debug!("txn {}: rolled back to {}", self.txn_id, name);
        Ok(())
    }

    pub fn release_savepoint(&mut self, name: &str) -> ConceptResult<()> {
        self.savepoints
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ConceptError::unknown_label(name))
    }

    // ==================== Types ====================

    /// Create an entity type under `entity`, or return the existing one.
    pub fn put_entity_type(&mut self, label: &str) -> ConceptResult<TypeId> {
        self.put_type(label, TypeBody::Entity)
    }

    /// Create a relation type under `relation`, or return the existing one.
    pub fn put_relation_type(&mut self, label: &str) -> ConceptResult<TypeId> {
        self.put_type(label, TypeBody::relation())
    }

    /// Create a role under `role`, or return the existing one.
    pub fn put_role(&mut self, label: &str) -> ConceptResult<TypeId> {
        self.put_type(label, TypeBody::Role)
    }

    /// Create an attribute type under `attribute`, or return the existing one.
    ///
    /// An existing type already of the given data type is returned as is;
    /// any other data type goes through `set_data_type`.
    pub fn put_attribute_type(
        &mut self,
        label: &str,
        data_type: impl Into<Option<DataType>>,
    ) -> ConceptResult<TypeId> {
        let data_type = data_type.into();
        if let Some(existing) = self.existing(label, SchemaKind::Attribute)? {
            if let Some(dt) = data_type {
                if self.working.schema.effective_data_type(existing) != Some(dt) {
                    self.set_data_type(existing, dt)?;
                }
            }
            return Ok(existing);
        }
        self.put_type(label, TypeBody::attribute(data_type))
    }

    /// The element labelled `label` if it exists and is of `kind`.
    fn existing(&self, label: &str, kind: SchemaKind) -> ConceptResult<Option<TypeId>> {
        match self.working.schema.get_by_label(label) {
            Some(def) if def.kind() == kind => Ok(Some(def.id)),
            Some(_) => Err(ConceptError::label_in_use(label)),
            None => Ok(None),
        }
    }

    fn put_type(&mut self, label: &str, body: TypeBody) -> ConceptResult<TypeId> {
        let kind = body.kind();
        if let Some(existing) = self.existing(label, kind)? {
            return Ok(existing);
        }
        let supertype = self.working.schema.meta().of_kind(kind);
        self.working
            .engine()
            .validate_new_type(label, kind, supertype, self.max_label_len())?;

        let id = self.session.ids().type_id();
        let def = TypeDef::new(id, label, body);
        let data_type = def.declared_data_type();
        self.working.schema.insert(def, supertype)?;
        self.record(Mutation::DefineType {
            id,
            label: Label::new(label),
            kind,
            supertype,
        });
        if let Some(data_type) = data_type {
            self.record(Mutation::SetDataType { id, data_type });
        }
        Ok(id)
    }

    /// Move `ty` under `supertype`.
    pub fn set_supertype(&mut self, ty: TypeId, supertype: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_set_supertype(ty, supertype)?;
        if self.working.schema.direct_supertype(ty) == Some(supertype) {
            return Ok(());
        }
        self.working.schema.reparent(ty, supertype)?;
        self.record(Mutation::SetSupertype { id: ty, supertype });
        Ok(())
    }

    /// Rename `ty`. Attribute types carry their implicit types along.
    pub fn set_label(&mut self, ty: TypeId, label: &str) -> ConceptResult<()> {
        self.working
            .engine()
            .validate_set_label(ty, label, self.max_label_len())?;
        if self.working.schema.require(ty)?.label() == label {
            return Ok(());
        }

        let mut schema = self.working.schema.clone();
        schema.relabel(ty, Label::new(label))?;
        if let Some(implicit) = schema.implicit_for_attribute(ty).copied() {
            let (relation, owner, value) = implicit_labels(label);
            schema.relabel(implicit.relation, relation)?;
            schema.relabel(implicit.owner_role, owner)?;
            schema.relabel(implicit.value_role, value)?;
        }
        self.working.schema = schema;
        self.record(Mutation::SetLabel {
            id: ty,
            label: Label::new(label),
        });
        Ok(())
    }

    pub fn set_abstract(&mut self, ty: TypeId, is_abstract: bool) -> ConceptResult<()> {
        self.working.engine().validate_set_abstract(ty, is_abstract)?;
        let def = self.working.schema.def_mut(ty)?;
        if def.is_abstract == is_abstract {
            return Ok(());
        }
        def.is_abstract = is_abstract;
        self.record(Mutation::SetAbstract { id: ty, is_abstract });
        Ok(())
    }

    /// Delete a type with no subtypes and no instances.
    ///
    /// Declarations referring to it are withdrawn; an attribute type takes its
    /// implicit types with it.
    pub fn delete_type(&mut self, ty: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_delete_type(ty)?;

        let mut schema = self.working.schema.clone();
        let implicit = schema.unregister_implicit(ty);
        let ids: Vec<TypeId> = schema.all().map(|def| def.id).collect();
        for id in ids {
            let def = schema.def_mut(id)?;
            def.plays.remove(&ty);
            def.owns.remove(&ty);
            if let Some(implicit) = &implicit {
                def.plays.remove(&implicit.owner_role);
                def.plays.remove(&implicit.value_role);
            }
            if let TypeBody::Relation { relates, .. } = &mut def.body {
                relates.remove(&ty);
            }
        }
        if let Some(implicit) = implicit {
            schema.remove(implicit.relation)?;
            schema.remove(implicit.owner_role)?;
            schema.remove(implicit.value_role)?;
        }
        schema.remove(ty)?;

        self.working.schema = schema;
        self.record(Mutation::DeleteType { id: ty });
        Ok(())
    }

    // ==================== Attribute Types ====================

    pub fn set_data_type(&mut self, attribute: TypeId, data_type: DataType) -> ConceptResult<()> {
        self.working
            .engine()
            .validate_set_data_type(attribute, data_type)?;
        if let TypeBody::Attribute { data_type: declared, .. } = &mut self.working.schema.def_mut(attribute)?.body {
            if *declared == Some(data_type) {
                return Ok(());
            }
            *declared = Some(data_type);
        }
        self.record(Mutation::SetDataType {
            id: attribute,
            data_type,
        });
        Ok(())
    }

    /// Constrain the string values of `attribute` and its subtypes.
    pub fn set_regex(&mut self, attribute: TypeId, pattern: &str) -> ConceptResult<()> {
        let compiled = self.working.engine().validate_set_regex(attribute, pattern)?;
        if let TypeBody::Attribute { regex, .. } = &mut self.working.schema.def_mut(attribute)?.body {
            *regex = Some(compiled);
        }
        self.record(Mutation::SetRegex {
            id: attribute,
            pattern: pattern.to_string(),
        });
        Ok(())
    }

    pub fn unset_regex(&mut self, attribute: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_unset_regex(attribute)?;
        if let TypeBody::Attribute { regex, .. } = &mut self.working.schema.def_mut(attribute)?.body {
            if regex.take().is_none() {
                return Ok(());
            }
        }
        self.record(Mutation::UnsetRegex { id: attribute });
        Ok(())
    }

    // ==================== Plays & Relates ====================

    pub fn plays(&mut self, ty: TypeId, role: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_plays(ty, role)?;
        if self.working.schema.def_mut(ty)?.plays.insert(role) {
            self.record(Mutation::Plays { id: ty, role });
        }
        Ok(())
    }

    pub fn unplay(&mut self, ty: TypeId, role: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_unplay(ty, role)?;
        if self.working.schema.def_mut(ty)?.plays.remove(&role) {
            self.record(Mutation::Unplay { id: ty, role });
        }
        Ok(())
    }

    pub fn relates(&mut self, relation: TypeId, role: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_relates(relation, role)?;
        if let TypeBody::Relation { relates, .. } = &mut self.working.schema.def_mut(relation)?.body {
            if relates.insert(role) {
                self.record(Mutation::Relates { id: relation, role });
            }
        }
        Ok(())
    }

    pub fn unrelate(&mut self, relation: TypeId, role: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_unrelate(relation, role)?;
        if let TypeBody::Relation { relates, .. } = &mut self.working.schema.def_mut(relation)?.body {
            if relates.remove(&role) {
                self.record(Mutation::Unrelate { id: relation, role });
            }
        }
        Ok(())
    }

    // ==================== Has & Key ====================

    /// Let instances of `ty` hold instances of `attribute`.
    pub fn has(&mut self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_has(ty, attribute)?;
        if self.working.schema.require(ty)?.owns.contains_key(&attribute) {
            return Ok(());
        }
        self.declare_ownership(ty, attribute, Ownership::Has)?;
        self.record(Mutation::Has { id: ty, attribute });
        Ok(())
    }

    /// Withdraw `has` of `attribute` from `ty`, along with any `key`.
    pub fn unhas(&mut self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_unhas(ty, attribute)?;
        let implicit = self.working.schema.implicit_for_attribute(attribute).copied();
        let def = self.working.schema.def_mut(ty)?;
        if def.owns.remove(&attribute).is_none() {
            return Ok(());
        }
        if let Some(implicit) = implicit {
            def.plays.remove(&implicit.owner_role);
        }
        self.record(Mutation::Unhas { id: ty, attribute });
        Ok(())
    }

    /// Make `attribute` a key of `ty`, declaring `has` if needed.
    pub fn key(&mut self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_key(ty, attribute)?;
        let current = self.working.schema.require(ty)?.owns.get(&attribute).copied();
        if current == Some(Ownership::Key) {
            return Ok(());
        }
        self.declare_ownership(ty, attribute, Ownership::Key)?;
        self.record(Mutation::Key { id: ty, attribute });
        Ok(())
    }

    /// Drop the key annotation; the `has` stays.
    pub fn unkey(&mut self, ty: TypeId, attribute: TypeId) -> ConceptResult<()> {
        self.working.engine().validate_unkey(ty, attribute)?;
        let def = self.working.schema.def_mut(ty)?;
        match def.owns.get_mut(&attribute) {
            Some(ownership) if ownership.is_key() => *ownership = Ownership::Has,
            _ => return Ok(()),
        }
        self.record(Mutation::Unkey { id: ty, attribute });
        Ok(())
    }

    fn declare_ownership(&mut self, ty: TypeId, attribute: TypeId, ownership: Ownership) -> ConceptResult<()> {
        let implicit = self.ensure_implicit(attribute)?;
        let def = self.working.schema.def_mut(ty)?;
        def.plays.insert(implicit.owner_role);
        def.owns.insert(attribute, ownership);
        Ok(())
    }

    /// The implicit relation recording ownerships of `attribute`, created on first use.
    fn ensure_implicit(&mut self, attribute: TypeId) -> ConceptResult<ImplicitOwnership> {
        if let Some(implicit) = self.working.schema.implicit_for_attribute(attribute) {
            return Ok(*implicit);
        }

        let mut schema = self.working.schema.clone();
        let (relation_label, owner_label, value_label) =
            implicit_labels(schema.require(attribute)?.label());
        let meta = *schema.meta();
        let ids = self.session.ids();
        let implicit = ImplicitOwnership {
            attribute,
            relation: ids.type_id(),
            owner_role: ids.type_id(),
            value_role: ids.type_id(),
        };

        schema.insert(TypeDef::new(implicit.owner_role, owner_label, TypeBody::Role), meta.role)?;
        schema.insert(TypeDef::new(implicit.value_role, value_label, TypeBody::Role), meta.role)?;
        let body = TypeBody::Relation {
            relates: [implicit.owner_role, implicit.value_role].into_iter().collect(),
            implicit_for: Some(attribute),
        };
        schema.insert(TypeDef::new(implicit.relation, relation_label, body), meta.relation)?;
        schema.def_mut(attribute)?.plays.insert(implicit.value_role);
        schema.register_implicit(implicit);

        self.working.schema = schema;
        Ok(implicit)
    }

    // ==================== Instances ====================

    pub fn create_entity(&mut self, ty: TypeId) -> ConceptResult<ThingId> {
        self.create(ty, SchemaKind::Entity)
    }

    pub fn create_relation(&mut self, ty: TypeId) -> ConceptResult<ThingId> {
        self.create(ty, SchemaKind::Relation)
    }

    fn create(&mut self, ty: TypeId, kind: SchemaKind) -> ConceptResult<ThingId> {
        self.working.engine().validate_create(ty, kind)?;
        let id = self.session.ids().thing_id();
        let thing = match kind {
            SchemaKind::Relation => Thing::relation(id, ty),
            _ => Thing::entity(id, ty),
        };
        self.working.graph.insert(thing);
        self.record(Mutation::CreateThing { id, type_id: ty });
        Ok(id)
    }

    /// Intern `value` as an attribute of `attribute`.
    ///
    /// Returns the existing attribute if one already holds the value.
    pub fn put_attribute(&mut self, attribute: TypeId, value: impl Into<Value>) -> ConceptResult<ThingId> {
        let value = value.into();
        self.working
            .engine()
            .validate_put_attribute(attribute, &value)?;
        if let Some(existing) = self.working.graph.find_attribute(attribute, &value) {
            return Ok(existing);
        }

        let id = self.session.ids().thing_id();
        self.working
            .graph
            .insert(Thing::attribute(id, attribute, value.clone()));
        self.record(Mutation::PutAttribute {
            id,
            type_id: attribute,
            value,
        });
        Ok(id)
    }

    pub fn add_role_player(&mut self, relation: ThingId, role: TypeId, player: ThingId) -> ConceptResult<()> {
        self.working
            .engine()
            .validate_add_role_player(relation, role, player)?;
        if self.working.graph.add_role_player(relation, role, player)? {
            self.record(Mutation::AddRolePlayer {
                relation,
                role,
                player,
            });
        }
        Ok(())
    }

    /// Returns false if `player` did not fill `role` in `relation`.
    pub fn remove_role_player(&mut self, relation: ThingId, role: TypeId, player: ThingId) -> ConceptResult<bool> {
        self.working
            .engine()
            .validate_remove_role_player(relation, role)?;
        let removed = self.working.graph.remove_role_player(relation, role, player)?;
        if removed {
            self.record(Mutation::RemoveRolePlayer {
                relation,
                role,
                player,
            });
        }
        Ok(removed)
    }

    /// Let `owner` hold `attribute`, returning the ownership relation.
    pub fn set_has(&mut self, owner: ThingId, attribute: ThingId) -> ConceptResult<ThingId> {
        let (decl, existing) = {
            let engine = self.working.engine();
            let decl = engine.validate_set_has(owner, attribute)?;
            (decl, engine.ownership_between(owner, attribute))
        };
        if let Some(existing) = existing {
            return Ok(existing);
        }
        let implicit = self
            .working
            .schema
            .implicit_for_attribute(decl.attribute)
            .copied()
            .ok_or_else(|| ConceptError::unknown_type(decl.attribute))?;

        let relation = self.session.ids().thing_id();
        let graph = &mut self.working.graph;
        graph.insert(Thing::relation(relation, implicit.relation));
        graph.add_role_player(relation, implicit.owner_role, owner)?;
        graph.add_role_player(relation, implicit.value_role, attribute)?;
        self.record(Mutation::SetHas {
            owner,
            attribute,
            relation,
        });
        Ok(relation)
    }

    /// Returns false if `owner` did not hold `attribute`.
    pub fn unset_has(&mut self, owner: ThingId, attribute: ThingId) -> ConceptResult<bool> {
        self.working.graph.require(owner)?;
        self.working.graph.require(attribute)?;
        let Some(relation) = self.working.engine().ownership_between(owner, attribute) else {
            return Ok(false);
        };
        self.working.graph.remove(relation)?;
        self.record(Mutation::UnsetHas { owner, attribute });
        Ok(true)
    }

    /// Delete an instance along with the ownerships it takes part in.
    pub fn delete_thing(&mut self, id: ThingId) -> ConceptResult<()> {
        let ownerships: Vec<ThingId> = {
            let engine = self.working.engine();
            engine.validate_delete_thing(id)?;
            engine
                .ownerships_of(id)
                .chain(engine.owners_of(id))
                .map(|edge| edge.relation)
                .collect()
        };
        for relation in ownerships {
            self.working.graph.remove(relation)?;
        }
        self.working.graph.remove(id)?;
        self.record(Mutation::DeleteThing { id });
        Ok(())
    }
}
