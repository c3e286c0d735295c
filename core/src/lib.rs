//! Ontic Core Types
//!
//! This crate provides the foundational types used throughout the concept layer:
//! - Identity types (TypeId, ThingId) and the identifier allocator seam
//! - The closed DataType registry and the tagged Value variant
//! - Labels and schema element kinds
//! - The error taxonomy and constraint violations

mod datatype;
mod error;
mod id;
mod label;
mod value;
mod violation;

pub use datatype::*;
pub use error::*;
pub use id::*;
pub use label::*;
pub use value::*;
pub use violation::*;
