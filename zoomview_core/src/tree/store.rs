// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property access.

use crate::screen::ColorIndex;

use super::id::{INVALID, NodeId};
use super::traverse::{Children, Descendants};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Draw a 1px border around the node's rectangle (when outlines are on).
    pub outline: bool,
    /// The node's label pushes descendant labels past its right edge.
    pub shove: bool,
}

/// Initial properties for a new node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Lower bound of the node's span within its parent.
    pub low: u32,
    /// Upper bound of the node's span within its parent.
    pub high: u32,
    /// Fill colour.
    pub color: ColorIndex,
    /// Label text; empty for unlabelled nodes.
    pub text: String,
    /// Outline and shove flags.
    pub flags: NodeFlags,
}

impl NodeData {
    /// Creates an unlabelled node occupying `[low, high)` of its parent.
    #[must_use]
    pub fn new(low: u32, high: u32) -> Self {
        Self {
            low,
            high,
            ..Self::default()
        }
    }

    /// Sets the fill colour.
    #[must_use]
    pub fn with_color(mut self, color: ColorIndex) -> Self {
        self.color = color;
        self
    }

    /// Sets the label text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Struct-of-arrays storage for a prediction tree.
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies a slot in
/// parallel arrays; destroyed nodes are recycled via a free list, and
/// generation counters prevent stale handle access.
///
/// Every node records its span as `[low, high)` out of
/// [`normalization`](Self::normalization) units of its parent. Children are
/// kept in bound order and never overlap; gaps are allowed.
#[derive(Debug)]
pub struct NodeStore {
    normalization: u32,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) child_count: Vec<u32>,

    // -- Properties --
    pub(crate) low: Vec<u32>,
    pub(crate) high: Vec<u32>,
    pub(crate) color: Vec<ColorIndex>,
    pub(crate) text: Vec<String>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl NodeStore {
    /// Creates an empty store whose bounds are out of `normalization`.
    ///
    /// # Panics
    ///
    /// Panics if `normalization` is zero.
    #[must_use]
    pub fn new(normalization: u32) -> Self {
        assert!(normalization > 0, "normalization must be positive");
        Self {
            normalization,
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            child_count: Vec::new(),
            low: Vec::new(),
            high: Vec::new(),
            color: Vec::new(),
            text: Vec::new(),
            flags: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// The bound denominator shared by every node.
    #[inline]
    #[must_use]
    pub const fn normalization(&self) -> u32 {
        self.normalization
    }

    // -- Allocation API --

    /// Creates a detached node and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics unless `0 <= low < high <= normalization`.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        assert!(
            data.low < data.high && data.high <= self.normalization,
            "malformed bounds [{}, {}) for normalization {}",
            data.low,
            data.high,
            self.normalization
        );
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.child_count[i] = 0;
            self.low[i] = data.low;
            self.high[i] = data.high;
            self.color[i] = data.color;
            self.text[i] = data.text;
            self.flags[i] = data.flags;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.child_count.push(0);
            self.low.push(data.low);
            self.high.push(data.high);
            self.color.push(data.color);
            self.text.push(data.text);
            self.flags.push(data.flags);
            self.generation.push(0);
            idx
        };
        self.handle(idx)
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.text[idx as usize].clear();
        self.free_list.push(idx);
    }

    /// Destroys every descendant of `id`, leaving it a leaf.
    ///
    /// Returns the number of nodes destroyed.
    pub fn remove_children(&mut self, id: NodeId) -> usize {
        self.validate(id);
        let doomed: Vec<NodeId> = self.descendants(id).skip(1).collect();
        // Pre-order reversed is children-before-parents.
        for &node in doomed.iter().rev() {
            self.destroy_node(node);
        }
        doomed.len()
    }

    /// Destroys `id` together with its whole subtree.
    ///
    /// Returns the number of nodes destroyed.
    pub fn destroy_subtree(&mut self, id: NodeId) -> usize {
        let removed = self.remove_children(id);
        self.destroy_node(id);
        removed + 1
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child`'s span starts below the current last child's upper bound.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx as usize;
        let c = child.idx as usize;
        assert!(self.parent[c] == INVALID, "child already has a parent");
        assert!(parent != child, "node cannot be its own child");

        let last = self.last_child[p];
        if last != INVALID {
            assert!(
                self.low[c] >= self.high[last as usize],
                "children out of order: [{}, {}) after [{}, {})",
                self.low[c],
                self.high[c],
                self.low[last as usize],
                self.high[last as usize]
            );
            self.next_sibling[last as usize] = child.idx;
            self.prev_sibling[c] = last;
        } else {
            self.first_child[p] = child.idx;
        }
        self.last_child[p] = child.idx;
        self.parent[c] = parent.idx;
        self.child_count[p] += 1;
    }

    /// Detaches `child` from its parent, making it a root.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] != INVALID,
            "node has no parent"
        );
        self.unlink_from_parent(child.idx);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns a pre-order iterator over `id` and all its descendants.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.child_count[id.idx as usize] as usize
    }

    /// Returns the `index`th child, if there is one.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Number of nodes strictly below `id`.
    #[must_use]
    pub fn descendant_count(&self, id: NodeId) -> usize {
        self.descendants(id).count() - 1
    }

    // -- Property getters --

    /// Lower bound of the node's span within its parent.
    #[must_use]
    pub fn low_bound(&self, id: NodeId) -> u32 {
        self.validate(id);
        self.low[id.idx as usize]
    }

    /// Upper bound of the node's span within its parent.
    #[must_use]
    pub fn high_bound(&self, id: NodeId) -> u32 {
        self.validate(id);
        self.high[id.idx as usize]
    }

    /// `high_bound - low_bound`.
    #[must_use]
    pub fn range(&self, id: NodeId) -> u32 {
        self.validate(id);
        self.high[id.idx as usize] - self.low[id.idx as usize]
    }

    /// Fill colour.
    #[must_use]
    pub fn color(&self, id: NodeId) -> ColorIndex {
        self.validate(id);
        self.color[id.idx as usize]
    }

    /// Label text.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.text[id.idx as usize]
    }

    /// Outline and shove flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    // -- Property setters --

    /// Sets the fill colour.
    pub fn set_color(&mut self, id: NodeId, color: ColorIndex) {
        self.validate(id);
        self.color[id.idx as usize] = color;
    }

    /// Sets the label text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.validate(id);
        self.text[id.idx as usize] = text.into();
    }

    /// Sets the flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
    }

    // -- Internal helpers --

    /// Builds the current handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i] as usize;
        let prev = self.prev_sibling[i];
        let next = self.next_sibling[i];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            self.last_child[p] = prev;
        }

        self.child_count[p] -= 1;
        self.parent[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.next_sibling[i] = INVALID;
    }
}
