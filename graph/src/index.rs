//! Indexes for graph lookups.

use crate::RolePlayer;
use ontic_core::{ThingId, TypeId, Value, ValueKey};
use std::collections::{BTreeSet, HashMap};

/// Type index: TypeId -> Set<ThingId>, keyed by direct type.
///
/// Sets are ordered so iteration over instances is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    index: HashMap<TypeId, BTreeSet<ThingId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, thing_id: ThingId) {
        self.index.entry(type_id).or_default().insert(thing_id);
    }

    pub fn remove(&mut self, type_id: TypeId, thing_id: ThingId) {
        if let Some(set) = self.index.get_mut(&type_id) {
            set.remove(&thing_id);
            if set.is_empty() {
                self.index.remove(&type_id);
            }
        }
    }

    pub fn get(&self, type_id: TypeId) -> impl Iterator<Item = ThingId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, type_id: TypeId) -> usize {
        self.index.get(&type_id).map_or(0, BTreeSet::len)
    }
}

/// Key for the attribute index: (attribute type, value identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub type_id: TypeId,
    pub value: ValueKey,
}

impl AttrKey {
    pub fn new(type_id: TypeId, value: &Value) -> Self {
        Self {
            type_id,
            value: value.key(),
        }
    }
}

/// Attribute index: (TypeId, value) -> the unique attribute holding it.
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    exact: HashMap<AttrKey, ThingId>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `thing_id` as the attribute of `type_id` holding `value`.
    ///
    /// Returns the attribute already holding it, leaving the index unchanged.
    pub fn insert(&mut self, type_id: TypeId, value: &Value, thing_id: ThingId) -> Option<ThingId> {
        let key = AttrKey::new(type_id, value);
        if let Some(&existing) = self.exact.get(&key) {
            return Some(existing);
        }
        self.exact.insert(key, thing_id);
        None
    }

    pub fn remove(&mut self, type_id: TypeId, value: &Value) {
        self.exact.remove(&AttrKey::new(type_id, value));
    }

    pub fn find(&self, type_id: TypeId, value: &Value) -> Option<ThingId> {
        self.exact.get(&AttrKey::new(type_id, value)).copied()
    }
}

/// Role player index: player -> { (relation, role) }.
#[derive(Debug, Clone, Default)]
pub struct RolePlayerIndex {
    index: HashMap<ThingId, BTreeSet<(ThingId, TypeId)>>,
}

impl RolePlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relation: ThingId, role_player: RolePlayer) {
        self.index
            .entry(role_player.player)
            .or_default()
            .insert((relation, role_player.role));
    }

    pub fn remove(&mut self, relation: ThingId, role_player: RolePlayer) {
        if let Some(set) = self.index.get_mut(&role_player.player) {
            set.remove(&(relation, role_player.role));
            if set.is_empty() {
                self.index.remove(&role_player.player);
            }
        }
    }

    /// Relations `player` plays a role in, with the role played.
    pub fn relations_of(&self, player: ThingId) -> impl Iterator<Item = (ThingId, TypeId)> + '_ {
        self.index
            .get(&player)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn is_playing(&self, player: ThingId) -> bool {
        self.index.contains_key(&player)
    }
}
