//! Journal entry types.

use chrono::{DateTime, Utc};
use ontic_core::{DataType, Label, SchemaKind, ThingId, TypeId, Value};
use serde::{Deserialize, Serialize};

/// Log Sequence Number - unique identifier for each journal record.
pub type Lsn = u64;

/// Transaction ID.
pub type TxnId = u64;

/// One applied mutation, in the order the transaction applied it.
///
/// Implicit ownership types are never recorded. Replaying the first `Has` or
/// `Key` on an attribute type recreates them, and `SetLabel` or `DeleteType`
/// of that attribute type carries them along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// A schema element was created.
    DefineType {
        id: TypeId,
        label: Label,
        kind: SchemaKind,
        supertype: TypeId,
    },
    DeleteType { id: TypeId },
    SetSupertype { id: TypeId, supertype: TypeId },
    SetLabel { id: TypeId, label: Label },
    SetAbstract { id: TypeId, is_abstract: bool },
    SetDataType { id: TypeId, data_type: DataType },
    SetRegex { id: TypeId, pattern: String },
    UnsetRegex { id: TypeId },
    Plays { id: TypeId, role: TypeId },
    Unplay { id: TypeId, role: TypeId },
    Relates { id: TypeId, role: TypeId },
    Unrelate { id: TypeId, role: TypeId },
    Has { id: TypeId, attribute: TypeId },
    Unhas { id: TypeId, attribute: TypeId },
    Key { id: TypeId, attribute: TypeId },
    Unkey { id: TypeId, attribute: TypeId },

    /// An entity or relation was created.
    CreateThing { id: ThingId, type_id: TypeId },
    /// A new attribute was interned.
    PutAttribute {
        id: ThingId,
        type_id: TypeId,
        value: Value,
    },
    AddRolePlayer {
        relation: ThingId,
        role: TypeId,
        player: ThingId,
    },
    RemoveRolePlayer {
        relation: ThingId,
        role: TypeId,
        player: ThingId,
    },
    /// An ownership was recorded as `relation`.
    SetHas {
        owner: ThingId,
        attribute: ThingId,
        relation: ThingId,
    },
    UnsetHas { owner: ThingId, attribute: ThingId },
    DeleteThing { id: ThingId },
}

impl Mutation {
    /// Returns true for mutations of the schema rather than of instances.
    pub fn is_schema(&self) -> bool {
        !matches!(
            self,
            Mutation::CreateThing { .. }
                | Mutation::PutAttribute { .. }
                | Mutation::AddRolePlayer { .. }
                | Mutation::RemoveRolePlayer { .. }
                | Mutation::SetHas { .. }
                | Mutation::UnsetHas { .. }
                | Mutation::DeleteThing { .. }
        )
    }
}

/// Journal entry types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum WalEntry {
    /// Begin a transaction.
    Begin { txn_id: TxnId },

    /// A mutation applied by a transaction.
    Apply { txn_id: TxnId, mutation: Mutation },

    /// Commit a transaction.
    Commit {
        txn_id: TxnId,
        committed_at: DateTime<Utc>,
    },
}

impl WalEntry {
    /// Get the transaction ID for this entry.
    pub fn txn_id(&self) -> TxnId {
        match self {
            WalEntry::Begin { txn_id } => *txn_id,
            WalEntry::Apply { txn_id, .. } => *txn_id,
            WalEntry::Commit { txn_id, .. } => *txn_id,
        }
    }

    /// Check if this is a commit entry.
    pub fn is_commit(&self) -> bool {
        matches!(self, WalEntry::Commit { .. })
    }
}

/// A journal record with its LSN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalRecord {
    /// Log sequence number.
    pub lsn: Lsn,
    /// The entry data.
    pub entry: WalEntry,
}

impl WalRecord {
    /// Create a new journal record.
    pub fn new(lsn: Lsn, entry: WalEntry) -> Self {
        Self { lsn, entry }
    }
}
