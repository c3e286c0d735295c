//! Inheritance-aware resolution of schema declarations.

use crate::{Ownership, Pattern, Schema, TypeBody};
use ontic_core::{DataType, TypeId};
use std::collections::{BTreeMap, BTreeSet};

/// A `has`/`key` declaration found while resolving ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipDecl {
    /// Type that carries the declaration (the owner type or an ancestor).
    pub owner: TypeId,
    /// Declared attribute type (the attribute's type or an ancestor).
    pub attribute: TypeId,
    pub ownership: Ownership,
}

impl Schema {
    /// Data type of an attribute type: its own, else the nearest ancestor's.
    pub fn effective_data_type(&self, attribute: TypeId) -> Option<DataType> {
        self.supertypes(attribute)
            .filter_map(|id| self.get(id))
            .find_map(|def| def.declared_data_type())
    }

    /// Regexes constraining an attribute type, its own first.
    pub fn patterns(&self, attribute: TypeId) -> impl Iterator<Item = (TypeId, &Pattern)> + '_ {
        self.supertypes(attribute)
            .filter_map(move |id| self.get(id))
            .filter_map(|def| def.regex().map(|p| (def.id, p)))
    }

    /// Returns true if `ty` or an ancestor declares it plays `role`.
    pub fn plays_role(&self, ty: TypeId, role: TypeId) -> bool {
        self.plays_role_without(ty, role, None)
    }

    /// Like `plays_role`, ignoring the declaration `(declarer, role)`.
    pub fn plays_role_without(
        &self,
        ty: TypeId,
        role: TypeId,
        ignored: Option<(TypeId, TypeId)>,
    ) -> bool {
        self.supertypes(ty).any(|id| {
            Some((id, role)) != ignored
                && self.get(id).is_some_and(|def| def.plays.contains(&role))
        })
    }

    /// Every role `ty` may play, including inherited declarations.
    pub fn playable_roles(&self, ty: TypeId) -> BTreeSet<TypeId> {
        self.supertypes(ty)
            .filter_map(|id| self.get(id))
            .flat_map(|def| def.plays.iter().copied())
            .collect()
    }

    /// Returns true if `relation` or an ancestor relates `role`.
    pub fn relates_role(&self, relation: TypeId, role: TypeId) -> bool {
        self.relates_role_without(relation, role, None)
    }

    /// Like `relates_role`, ignoring the declaration `(declarer, role)`.
    pub fn relates_role_without(
        &self,
        relation: TypeId,
        role: TypeId,
        ignored: Option<(TypeId, TypeId)>,
    ) -> bool {
        self.supertypes(relation).any(|id| {
            Some((id, role)) != ignored
                && self
                    .get(id)
                    .and_then(|def| def.relates())
                    .is_some_and(|relates| relates.contains(&role))
        })
    }

    /// Every role `relation` relates, including inherited declarations.
    pub fn related_roles(&self, relation: TypeId) -> BTreeSet<TypeId> {
        self.supertypes(relation)
            .filter_map(|id| self.get(id))
            .filter_map(|def| def.relates())
            .flat_map(|relates| relates.iter().copied())
            .collect()
    }

    /// The declaration letting `owner` instances hold `attribute` instances.
    ///
    /// The owner's nearest declaration wins; within one declarer the
    /// attribute's nearest ancestor wins.
    pub fn ownership(&self, owner: TypeId, attribute: TypeId) -> Option<OwnershipDecl> {
        self.ownership_without(owner, attribute, None)
    }

    /// Like `ownership`, ignoring the declaration `(declarer, attribute)`.
    pub fn ownership_without(
        &self,
        owner: TypeId,
        attribute: TypeId,
        ignored: Option<(TypeId, TypeId)>,
    ) -> Option<OwnershipDecl> {
        for declarer in self.supertypes(owner) {
            let Some(def) = self.get(declarer) else {
                continue;
            };
            if def.owns.is_empty() {
                continue;
            }
            for declared in self.supertypes(attribute) {
                if Some((declarer, declared)) == ignored {
                    continue;
                }
                if let Some(&ownership) = def.owns.get(&declared) {
                    return Some(OwnershipDecl {
                        owner: declarer,
                        attribute: declared,
                        ownership,
                    });
                }
            }
        }
        None
    }

    /// Every attribute type `owner` may hold, including inherited declarations.
    ///
    /// A `key` anywhere in the chain wins over a `has` for the same attribute type.
    pub fn owned_attributes(&self, owner: TypeId) -> BTreeMap<TypeId, Ownership> {
        let mut owned = BTreeMap::new();
        for def in self.supertypes(owner).filter_map(|id| self.get(id)) {
            for (&attribute, &ownership) in &def.owns {
                let entry = owned.entry(attribute).or_insert(ownership);
                if ownership.is_key() {
                    *entry = Ownership::Key;
                }
            }
        }
        owned
    }

    /// Key declarations applying to `owner`, nearest declarer first.
    pub fn key_declarations(&self, owner: TypeId) -> Vec<OwnershipDecl> {
        self.supertypes(owner)
            .filter_map(|id| self.get(id))
            .flat_map(|def| {
                def.owns
                    .iter()
                    .filter(|(_, o)| o.is_key())
                    .map(move |(&attribute, &ownership)| OwnershipDecl {
                        owner: def.id,
                        attribute,
                        ownership,
                    })
            })
            .collect()
    }

    /// Returns true if some type declares ownership of `attribute`.
    pub fn is_owned_anywhere(&self, attribute: TypeId) -> bool {
        self.all().any(|def| def.owns.contains_key(&attribute))
    }

    /// Returns true if `relation` is an implicit ownership relation type.
    pub fn is_implicit_relation(&self, relation: TypeId) -> bool {
        matches!(
            self.get(relation).map(|d| &d.body),
            Some(TypeBody::Relation {
                implicit_for: Some(_),
                ..
            })
        )
    }
}
