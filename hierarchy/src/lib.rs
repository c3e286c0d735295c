//! Ontic Hierarchy
//!
//! Generic supertype/subtype graph shared by every schema element kind.
//!
//! Responsibilities:
//! - Store one forward parent edge per node plus a children index
//! - Reject reparenting that would create a cycle
//! - Provide lazy, deterministic supertype and subtype walks

mod error;
mod hierarchy;
mod iter;

pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::Hierarchy;
pub use iter::{Subtypes, Supertypes};
