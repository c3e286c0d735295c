//! Ontic Session
//!
//! Entry point of the concept layer: one session per keyspace, a single
//! writer and any number of concurrent readers.
//!
//! Responsibilities:
//! - Configuration and identifier allocation
//! - Read transactions over immutable snapshots
//! - Write transactions exposing every schema and instance operation
//! - Commit-time validation, the persistence hook and atomic publication

mod config;
mod error;
mod session;
mod state;
mod transaction;

pub use config::SessionConfig;
pub use error::{ConfigError, ConfigResult};
pub use session::{Session, SessionBuilder};
pub use state::ConceptState;
pub use transaction::{ReadTransaction, WriteTransaction};
