//! Ontic Schema
//!
//! The schema elements of one keyspace: entity, relation and attribute types
//! and roles, their labels, hierarchies and declarations.
//!
//! Responsibilities:
//! - Bootstrap the meta types
//! - Keep the label index and both hierarchies in step with the arena
//! - Resolve inherited `plays`, `relates`, `has`/`key`, data types and regexes

pub mod meta;
mod pattern;
mod resolve;
mod schema;
mod types;

pub use meta::MetaTypes;
pub use pattern::Pattern;
pub use resolve::OwnershipDecl;
pub use schema::Schema;
pub use types::*;
