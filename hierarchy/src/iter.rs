//! Lazy hierarchy walks.

use crate::Hierarchy;
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FusedIterator;

/// Walks from a node up to its root, yielding the node first.
#[derive(Debug)]
pub struct Supertypes<'a, K> {
    hierarchy: &'a Hierarchy<K>,
    next: Option<K>,
    visited: HashSet<K>,
}

impl<'a, K: Copy + Eq + Hash + Debug> Supertypes<'a, K> {
    pub(crate) fn new(hierarchy: &'a Hierarchy<K>, start: K) -> Self {
        let next = hierarchy.contains(start).then_some(start);
        Self {
            hierarchy,
            next,
            visited: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Iterator for Supertypes<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next.take()?;
        if !self.visited.insert(current) {
            return None;
        }
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

impl<K: Copy + Eq + Hash + Debug> FusedIterator for Supertypes<'_, K> {}

/// Walks a node's subtree breadth first, yielding the node first.
#[derive(Debug)]
pub struct Subtypes<'a, K> {
    hierarchy: &'a Hierarchy<K>,
    queue: VecDeque<K>,
}

impl<'a, K: Copy + Eq + Hash + Debug> Subtypes<'a, K> {
    pub(crate) fn new(hierarchy: &'a Hierarchy<K>, start: K) -> Self {
        let mut queue = VecDeque::new();
        if hierarchy.contains(start) {
            queue.push_back(start);
        }
        Self { hierarchy, queue }
    }
}

impl<K: Copy + Eq + Hash + Debug> Iterator for Subtypes<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.queue.pop_front()?;
        self.queue
            .extend(self.hierarchy.children(current).iter().copied());
        Some(current)
    }
}

impl<K: Copy + Eq + Hash + Debug> FusedIterator for Subtypes<'_, K> {}
