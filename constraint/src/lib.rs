//! Ontic Constraint Engine
//!
//! Validates schema and instance mutations against the current schema and
//! graph before they are applied.
//!
//! Responsibilities:
//! - Label, kind and hierarchy rules for schema edits
//! - Data type, regex, `plays`, `relates`, `has` and `key` rules
//! - Instance creation, role player and ownership rules
//! - Commit-time key cardinality checking

mod commit;
mod engine;
mod instance_rules;
mod schema_rules;

pub use engine::{ConstraintEngine, OwnershipEdge};
