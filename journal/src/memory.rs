//! In-memory journal.

use crate::{CommitContext, CommitHook, JournalError, JournalResult, Lsn, Mutation, TxnId, WalEntry, WalRecord};
use chrono::Utc;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Log {
    /// All recorded entries.
    records: Vec<WalRecord>,
    /// Next LSN to assign.
    next_lsn: Lsn,
}

/// In-memory journal for testing and simple use cases.
///
/// Records `Begin`, one `Apply` per mutation and `Commit` for every
/// transaction handed to it as a commit hook.
#[derive(Debug)]
pub struct MemoryJournal {
    log: Mutex<Log>,
    /// Reject the next commit, for exercising aborted commits.
    reject_next: AtomicBool,
}

impl Default for MemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryJournal {
    /// Create a new empty memory journal.
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Log {
                records: Vec::new(),
                next_lsn: 1,
            }),
            reject_next: AtomicBool::new(false),
        }
    }

    fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry to the journal.
    pub fn append(&self, entry: WalEntry) -> Lsn {
        let mut log = self.log();
        let lsn = log.next_lsn;
        log.next_lsn += 1;
        log.records.push(WalRecord::new(lsn, entry));
        lsn
    }

    /// Make the next commit fail with `JournalError::Rejected`.
    pub fn reject_next_commit(&self) {
        self.reject_next.store(true, Ordering::SeqCst);
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<WalRecord> {
        self.log().records.clone()
    }

    pub fn len(&self) -> usize {
        self.log().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().records.is_empty()
    }

    /// IDs of committed transactions, in commit order.
    pub fn committed(&self) -> Vec<TxnId> {
        self.log()
            .records
            .iter()
            .filter(|r| r.entry.is_commit())
            .map(|r| r.entry.txn_id())
            .collect()
    }

    /// Mutations recorded for one transaction.
    pub fn mutations_of(&self, txn_id: TxnId) -> Vec<Mutation> {
        self.log()
            .records
            .iter()
            .filter_map(|r| match &r.entry {
                WalEntry::Apply { txn_id: id, mutation } if *id == txn_id => Some(mutation.clone()),
                _ => None,
            })
            .collect()
    }

    /// Export the journal as JSON lines, one record per line.
    pub fn to_json_lines(&self) -> JournalResult<String> {
        let log = self.log();
        let mut out = String::new();
        for record in &log.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Load records previously exported with `to_json_lines`.
    pub fn from_json_lines(input: &str) -> JournalResult<Self> {
        let journal = Self::new();
        {
            let mut log = journal.log();
            for line in input.lines().filter(|l| !l.trim().is_empty()) {
                let record: WalRecord = serde_json::from_str(line)?;
                log.next_lsn = log.next_lsn.max(record.lsn + 1);
                log.records.push(record);
            }
        }
        Ok(journal)
    }
}

impl CommitHook for MemoryJournal {
    fn on_commit(&self, ctx: &CommitContext<'_>) -> JournalResult<()> {
        if self.reject_next.swap(false, Ordering::SeqCst) {
            return Err(JournalError::rejected(format!("transaction {} refused", ctx.txn_id)));
        }

        let mut log = self.log();
        let mut entries = Vec::with_capacity(ctx.mutations.len() + 2);
        entries.push(WalEntry::Begin { txn_id: ctx.txn_id });
        entries.extend(ctx.mutations.iter().map(|m| WalEntry::Apply {
            txn_id: ctx.txn_id,
            mutation: m.clone(),
        }));
        entries.push(WalEntry::Commit {
            txn_id: ctx.txn_id,
            committed_at: Utc::now(),
        });
        for entry in entries {
            let lsn = log.next_lsn;
            log.next_lsn += 1;
            log.records.push(WalRecord::new(lsn, entry));
        }

        debug!("journaled transaction {} ({} mutations)", ctx.txn_id, ctx.mutations.len());
        Ok(())
    }
}
