//! Instance storage.

use crate::index::{AttributeIndex, RolePlayerIndex, TypeIndex};
use crate::{RolePlayer, Thing, ThingBody};
use log::debug;
use ontic_core::{ConceptError, ConceptResult, ThingId, TypeId, Value};
use std::collections::HashMap;

/// The in-memory instance storage.
///
/// Storage is schema-agnostic: it keeps things and their indexes consistent
/// but does not check types. Callers validate against the schema first.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Thing storage
    things: HashMap<ThingId, Thing>,
    /// Direct type index
    type_index: TypeIndex,
    /// Attribute interning index
    attr_index: AttributeIndex,
    /// Role player index
    player_index: RolePlayerIndex,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Thing Operations ====================

    /// Store a new thing.
    ///
    /// Attributes are interned: if an attribute of the same type already holds
    /// the value, nothing is stored and the existing ID is returned.
    pub fn insert(&mut self, thing: Thing) -> ThingId {
        if let ThingBody::Attribute { value } = &thing.body {
            if let Some(existing) = self.attr_index.insert(thing.type_id, value, thing.id) {
                return existing;
            }
        }
        if let ThingBody::Relation { role_players } = &thing.body {
            for rp in role_players {
                self.player_index.insert(thing.id, *rp);
            }
        }
        self.type_index.insert(thing.type_id, thing.id);
        let id = thing.id;
        self.things.insert(id, thing);
        id
    }

    /// Get a thing by ID.
    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(&id)
    }

    /// Get a thing by ID or fail with `UnknownConcept`.
    pub fn require(&self, id: ThingId) -> ConceptResult<&Thing> {
        self.things
            .get(&id)
            .ok_or_else(|| ConceptError::unknown_thing(id))
    }

    pub fn contains(&self, id: ThingId) -> bool {
        self.things.contains_key(&id)
    }

    /// Remove a thing.
    ///
    /// Relations it plays in lose it as a role player; the relations
    /// themselves are kept.
    pub fn remove(&mut self, id: ThingId) -> ConceptResult<Thing> {
        let thing = self
            .things
            .remove(&id)
            .ok_or_else(|| ConceptError::unknown_thing(id))?;

        self.type_index.remove(thing.type_id, id);
        match &thing.body {
            ThingBody::Attribute { value } => self.attr_index.remove(thing.type_id, value),
            ThingBody::Relation { role_players } => {
                for rp in role_players {
                    self.player_index.remove(id, *rp);
                }
            }
            ThingBody::Entity => {}
        }

        let memberships: Vec<(ThingId, TypeId)> = self.player_index.relations_of(id).collect();
        for (relation, role) in memberships {
            self.detach(relation, RolePlayer::new(role, id));
        }

        debug!("removed {} of type {}", id, thing.type_id);
        Ok(thing)
    }

    // ==================== Role Players ====================

    /// Add a role player to a relation. Returns false if already present.
    pub fn add_role_player(&mut self, relation: ThingId, role: TypeId, player: ThingId) -> ConceptResult<bool> {
        if !self.things.contains_key(&player) {
            return Err(ConceptError::unknown_thing(player));
        }
        let rp = RolePlayer::new(role, player);
        let added = match self.things.get_mut(&relation).map(|t| &mut t.body) {
            Some(ThingBody::Relation { role_players }) => role_players.insert(rp),
            _ => return Err(ConceptError::unknown_thing(relation)),
        };
        if added {
            self.player_index.insert(relation, rp);
        }
        Ok(added)
    }

    /// Remove a role player from a relation. Returns false if absent.
    pub fn remove_role_player(&mut self, relation: ThingId, role: TypeId, player: ThingId) -> ConceptResult<bool> {
        match self.things.get(&relation).map(|t| &t.body) {
            Some(ThingBody::Relation { .. }) => Ok(self.detach(relation, RolePlayer::new(role, player))),
            _ => Err(ConceptError::unknown_thing(relation)),
        }
    }

    fn detach(&mut self, relation: ThingId, rp: RolePlayer) -> bool {
        let removed = match self.things.get_mut(&relation).map(|t| &mut t.body) {
            Some(ThingBody::Relation { role_players }) => role_players.remove(&rp),
            _ => false,
        };
        if removed {
            self.player_index.remove(relation, rp);
        }
        removed
    }

    /// Relations `player` plays a role in, with the role played.
    pub fn relations_of(&self, player: ThingId) -> impl Iterator<Item = (ThingId, TypeId)> + '_ {
        self.player_index.relations_of(player)
    }

    // ==================== Lookups ====================

    /// Instances whose direct type is `type_id`, in ID order.
    pub fn of_type(&self, type_id: TypeId) -> impl Iterator<Item = &Thing> + '_ {
        self.type_index
            .get(type_id)
            .filter_map(move |id| self.things.get(&id))
    }

    /// Number of instances whose direct type is `type_id`.
    pub fn count_of_type(&self, type_id: TypeId) -> usize {
        self.type_index.count(type_id)
    }

    /// The attribute of `type_id` holding `value`, if interned.
    pub fn find_attribute(&self, type_id: TypeId, value: &Value) -> Option<ThingId> {
        self.attr_index.find(type_id, value)
    }

    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}
