//! Single-inheritance hierarchy stored as an arena of forward edges.

use crate::error::{HierarchyError, HierarchyResult};
use crate::iter::{Subtypes, Supertypes};
use log::trace;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A forest where every node has at most one parent.
///
/// The parent edge is the source of truth; the children index is maintained
/// alongside every edit so subtype walks never scan the whole arena.
#[derive(Debug, Clone)]
pub struct Hierarchy<K> {
    /// Node -> direct parent (None for roots).
    parents: HashMap<K, Option<K>>,
    /// Node -> direct children, in insertion order.
    children: HashMap<K, Vec<K>>,
}

impl<K> Default for Hierarchy<K> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            children: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Hierarchy<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn insert_root(&mut self, node: K) -> HierarchyResult<(), K> {
        if self.parents.contains_key(&node) {
            return Err(HierarchyError::DuplicateNode(node));
        }
        self.parents.insert(node, None);
        self.children.insert(node, Vec::new());
        Ok(())
    }

    /// Add a node under an existing parent.
    pub fn insert(&mut self, node: K, parent: K) -> HierarchyResult<(), K> {
        if self.parents.contains_key(&node) {
            return Err(HierarchyError::DuplicateNode(node));
        }
        let siblings = self
            .children
            .get_mut(&parent)
            .ok_or(HierarchyError::UnknownNode(parent))?;
        siblings.push(node);
        self.parents.insert(node, Some(parent));
        self.children.insert(node, Vec::new());
        Ok(())
    }

    pub fn contains(&self, node: K) -> bool {
        self.parents.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Direct parent of a node.
    pub fn parent(&self, node: K) -> Option<K> {
        self.parents.get(&node).copied().flatten()
    }

    /// Direct children of a node, in insertion order.
    pub fn children(&self, node: K) -> &[K] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_root(&self, node: K) -> bool {
        matches!(self.parents.get(&node), Some(None))
    }

    /// The node itself followed by its ancestors, nearest first.
    pub fn supertypes(&self, node: K) -> Supertypes<'_, K> {
        Supertypes::new(self, node)
    }

    /// The node itself followed by all its descendants, breadth first.
    pub fn subtypes(&self, node: K) -> Subtypes<'_, K> {
        Subtypes::new(self, node)
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn is_subtype_of(&self, node: K, ancestor: K) -> bool {
        self.supertypes(node).any(|n| n == ancestor)
    }

    /// Number of edges between a node and its root.
    pub fn depth(&self, node: K) -> usize {
        self.supertypes(node).count().saturating_sub(1)
    }

    /// Check that `parent` can become the parent of `node`.
    ///
    /// Walks upward from `parent`; reaching `node` means `parent` is `node`
    /// itself or one of its descendants.
    pub fn check_reparent(&self, node: K, parent: K) -> HierarchyResult<(), K> {
        if !self.contains(node) {
            return Err(HierarchyError::UnknownNode(node));
        }
        if !self.contains(parent) {
            return Err(HierarchyError::UnknownNode(parent));
        }
        if self.is_root(node) {
            return Err(HierarchyError::Root(node));
        }

        let mut visited = HashSet::new();
        let mut current = Some(parent);
        while let Some(candidate) = current {
            trace!("cycle check {:?} -> {:?}: visiting {:?}", node, parent, candidate);
            if candidate == node {
                return Err(HierarchyError::Cycle { node, parent });
            }
            if !visited.insert(candidate) {
                break;
            }
            current = self.parent(candidate);
        }
        Ok(())
    }

    /// Move `node` (with its whole subtree) under `parent`.
    ///
    /// Returns the previous parent.
    pub fn reparent(&mut self, node: K, parent: K) -> HierarchyResult<Option<K>, K> {
        self.check_reparent(node, parent)?;

        let old = self.parent(node);
        if old == Some(parent) {
            return Ok(old);
        }
        if let Some(old_parent) = old {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|&c| c != node);
            }
        }
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.push(node);
        }
        self.parents.insert(node, Some(parent));
        Ok(old)
    }

    /// Remove a leaf node.
    pub fn remove(&mut self, node: K) -> HierarchyResult<(), K> {
        let parent = *self
            .parents
            .get(&node)
            .ok_or(HierarchyError::UnknownNode(node))?;
        if !self.children(node).is_empty() {
            return Err(HierarchyError::HasChildren(node));
        }
        if let Some(parent) = parent {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|&c| c != node);
            }
        }
        self.parents.remove(&node);
        self.children.remove(&node);
        Ok(())
    }
}
