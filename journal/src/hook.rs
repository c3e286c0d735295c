//! The commit hook consumed by sessions.

use crate::{JournalResult, Mutation, TxnId};
use ontic_graph::Graph;
use ontic_schema::Schema;
use std::fmt;

/// What a hook sees of a transaction about to be published.
#[derive(Debug, Clone, Copy)]
pub struct CommitContext<'a> {
    pub txn_id: TxnId,
    /// Mutations in the order they were applied.
    pub mutations: &'a [Mutation],
    /// The state that will become visible once the hook returns.
    pub schema: &'a Schema,
    pub graph: &'a Graph,
}

/// Persistence collaborator invoked once per commit.
///
/// Called synchronously while the writer lock is held. Returning an error
/// aborts the commit and discards the transaction.
pub trait CommitHook: Send + Sync + fmt::Debug {
    fn on_commit(&self, ctx: &CommitContext<'_>) -> JournalResult<()>;
}
