//! Ontic Graph Storage
//!
//! Instances of the schema with indexed access:
//! - Thing storage (entities, relations, attributes)
//! - Type index: find instances by their direct type
//! - Attribute index: find the unique attribute of a type holding a value
//! - Role player index: find the relations an instance plays a role in

mod graph;
mod index;
mod thing;

pub use graph::Graph;
pub use index::{AttributeIndex, RolePlayerIndex, TypeIndex};
pub use thing::{RolePlayer, Thing, ThingBody};
