//! Instance definitions.

use ontic_core::{ThingId, TypeId, Value};
use std::collections::BTreeSet;

/// A role filled by a player in a relation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RolePlayer {
    pub role: TypeId,
    pub player: ThingId,
}

impl RolePlayer {
    pub fn new(role: TypeId, player: ThingId) -> Self {
        Self { role, player }
    }
}

/// Kind-specific part of an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum ThingBody {
    Entity,
    Relation { role_players: BTreeSet<RolePlayer> },
    Attribute { value: Value },
}

/// An instance of an entity, relation or attribute type.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pub id: ThingId,
    /// Direct type.
    pub type_id: TypeId,
    pub body: ThingBody,
}

impl Thing {
    pub fn entity(id: ThingId, type_id: TypeId) -> Self {
        Self {
            id,
            type_id,
            body: ThingBody::Entity,
        }
    }

    pub fn relation(id: ThingId, type_id: TypeId) -> Self {
        Self {
            id,
            type_id,
            body: ThingBody::Relation {
                role_players: BTreeSet::new(),
            },
        }
    }

    pub fn attribute(id: ThingId, type_id: TypeId, value: Value) -> Self {
        Self {
            id,
            type_id,
            body: ThingBody::Attribute { value },
        }
    }

    /// The value held, for attributes.
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            ThingBody::Attribute { value } => Some(value),
            _ => None,
        }
    }

    /// The role players, for relations.
    pub fn role_players(&self) -> Option<&BTreeSet<RolePlayer>> {
        match &self.body {
            ThingBody::Relation { role_players } => Some(role_players),
            _ => None,
        }
    }

    /// Players of `role`, for relations.
    pub fn players_of(&self, role: TypeId) -> impl Iterator<Item = ThingId> + '_ {
        self.role_players()
            .into_iter()
            .flatten()
            .filter(move |rp| rp.role == role)
            .map(|rp| rp.player)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.body, ThingBody::Relation { .. })
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.body, ThingBody::Attribute { .. })
    }
}
