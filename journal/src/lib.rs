//! Ontic Journal
//!
//! The persistence boundary of the concept layer.
//!
//! Responsibilities:
//! - Describe every applied mutation as a serializable journal entry
//! - Hand committed transactions to a `CommitHook` before they are published
//! - Keep an in-memory log of committed transactions

mod entry;
mod error;
mod hook;
mod memory;

pub use entry::{Lsn, Mutation, TxnId, WalEntry, WalRecord};
pub use error::{JournalError, JournalResult};
pub use hook::{CommitContext, CommitHook};
pub use memory::MemoryJournal;
