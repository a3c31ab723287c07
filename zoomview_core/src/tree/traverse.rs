// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration.

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the direct children of a node, in bound order.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.handle(idx))
    }
}

/// Depth-first pre-order walk of a subtree, root included.
///
/// Created by [`NodeStore::descendants`]. Uses an explicit stack, so deep
/// chains do not grow the call stack.
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a NodeStore,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32) -> Self {
        Self {
            store,
            stack: vec![root],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push in reverse so the first child is visited next.
        let start = self.stack.len();
        let mut child = self.store.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.next_sibling[child as usize];
        }
        self.stack[start..].reverse();
        Some(self.store.handle(idx))
    }
}
