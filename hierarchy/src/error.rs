//! Hierarchy error types.

use std::fmt::Debug;
use thiserror::Error;

/// Errors that can occur while editing a hierarchy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError<K: Debug> {
    #[error("Node not in hierarchy: {0:?}")]
    UnknownNode(K),

    #[error("Node already in hierarchy: {0:?}")]
    DuplicateNode(K),

    #[error("Making {parent:?} the parent of {node:?} would create a cycle")]
    Cycle { node: K, parent: K },

    #[error("Node {0:?} still has children")]
    HasChildren(K),

    #[error("Node {0:?} is a root and cannot be reparented")]
    Root(K),
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T, K> = Result<T, HierarchyError<K>>;
