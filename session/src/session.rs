//! Session manager.

use crate::config::SessionConfig;
use crate::state::ConceptState;
use crate::transaction::{ReadTransaction, WriteTransaction};
use log::debug;
use ontic_core::{ConceptResult, IdAllocator, SequentialIds};
use ontic_journal::{CommitHook, TxnId};
use ontic_schema::Schema;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

/// Builds a session from its configuration and collaborators.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    ids: Option<Arc<dyn IdAllocator>>,
    hook: Option<Arc<dyn CommitHook>>,
}

impl SessionBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ids: None,
            hook: None,
        }
    }

    /// Use an external identifier source instead of `SequentialIds`.
    pub fn id_allocator(mut self, ids: Arc<dyn IdAllocator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Hand every commit to `hook` before publishing it.
    pub fn commit_hook(mut self, hook: Arc<dyn CommitHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Bootstrap the meta types and open the session.
    pub fn build(self) -> ConceptResult<Session> {
        self.config.validate()?;
        let first = self.config.first_concept_id;
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(SequentialIds::starting_at(first)) as Arc<dyn IdAllocator>);
        let schema = Schema::bootstrap(ids.as_ref())?;
        debug!("opened session on keyspace {}", self.config.keyspace);

        Ok(Session {
            config: self.config,
            ids,
            hook: self.hook,
            committed: RwLock::new(Arc::new(ConceptState::new(schema))),
            writer: Mutex::new(()),
            next_txn: AtomicU64::new(1),
        })
    }
}

/// A session on one keyspace.
///
/// Any number of `ReadTransaction`s may be open at once, each over the
/// snapshot committed when it began. At most one `WriteTransaction` exists at
/// a time; opening another blocks until the current one commits or is
/// dropped.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    ids: Arc<dyn IdAllocator>,
    hook: Option<Arc<dyn CommitHook>>,
    /// Last committed state.
    committed: RwLock<Arc<ConceptState>>,
    /// Held by the open write transaction.
    writer: Mutex<()>,
    next_txn: AtomicU64,
}

impl Session {
    /// Open a session with the default collaborators.
    pub fn new(config: SessionConfig) -> ConceptResult<Self> {
        SessionBuilder::new(config).build()
    }

    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The last committed state.
    pub fn snapshot(&self) -> Arc<ConceptState> {
        Arc::clone(&self.committed.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Open a read transaction over the last committed state.
    pub fn read(&self) -> ReadTransaction {
        ReadTransaction::new(self.snapshot())
    }

    /// Open the write transaction, waiting for the current one to finish.
    pub fn write(&self) -> WriteTransaction<'_> {
        let guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        WriteTransaction::new(self, guard, self.allocate_txn())
    }

    /// Open the write transaction if no other one is open.
    pub fn try_write(&self) -> Option<WriteTransaction<'_>> {
        let guard = match self.writer.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(WriteTransaction::new(self, guard, self.allocate_txn()))
    }

    fn allocate_txn(&self) -> TxnId {
        self.next_txn.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn ids(&self) -> &dyn IdAllocator {
        self.ids.as_ref()
    }

    pub(crate) fn hook(&self) -> Option<&dyn CommitHook> {
        self.hook.as_deref()
    }

    /// Make `state` the committed state.
    pub(crate) fn publish(&self, state: ConceptState) {
        *self.committed.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
    }
}
