// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion policies.
//!
//! During a frame the renderer classifies every visited node and pushes it
//! to an [`ExpansionPolicy`]: leaves become candidates for expansion
//! (growing children), interior nodes become candidates for collapse
//! (dropping children). After the frame the host calls
//! [`BudgetPolicy::apply`] to spend a node budget on the most visible
//! candidates.

use std::collections::HashMap;

use crate::tree::{NodeId, NodeStore};

/// How the renderer classified a visited node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// The node has no children yet and could be expanded.
    Terminal,
    /// The node has children that could be dropped.
    Collapsible,
}

/// Receives classified nodes during a render pass.
pub trait ExpansionPolicy {
    /// Records a visited node whose span is `[y1, y2]`.
    fn push_node(&mut self, tree: &NodeStore, node: NodeId, y1: i64, y2: i64, class: NodeClass);
}

/// An [`ExpansionPolicy`] that ignores every node.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExpansion;

impl ExpansionPolicy for NoExpansion {
    fn push_node(&mut self, tree: &NodeStore, node: NodeId, y1: i64, y2: i64, class: NodeClass) {
        _ = (tree, node, y1, y2, class);
    }
}

/// Grows children for a node. Implemented by the prediction model.
pub trait NodeExpander {
    /// Populates `node` (currently a leaf) with children.
    fn expand(&mut self, tree: &mut NodeStore, node: NodeId);
}

/// Keeps the tree near a fixed node budget, favouring visible nodes.
///
/// A node's cost is the length of its span clipped to `[0, max_y]`. A node
/// is never worth more than its parent: when a child's cost reaches its
/// parent's it inherits the parent's cost, and a collapsible child in that
/// position is not queued at all (collapsing the parent covers it).
#[derive(Debug)]
pub struct BudgetPolicy {
    budget: usize,
    expected_children: usize,
    max_y: i64,
    costs: HashMap<NodeId, f64>,
    expandable: Vec<NodeId>,
    collapsible: Vec<NodeId>,
}

impl BudgetPolicy {
    /// Default node budget.
    pub const DEFAULT_BUDGET: usize = 1200;
    /// Nodes one expansion is assumed to add.
    pub const EXPECTED_CHILDREN: usize = 15;

    /// Creates a policy with the given node budget.
    #[must_use]
    pub fn new(budget: usize, max_y: i64) -> Self {
        Self {
            budget,
            expected_children: Self::EXPECTED_CHILDREN,
            max_y,
            costs: HashMap::new(),
            expandable: Vec::new(),
            collapsible: Vec::new(),
        }
    }

    /// Overrides the expected children per expansion.
    #[must_use]
    pub fn with_expected_children(mut self, n: usize) -> Self {
        self.expected_children = n;
        self
    }

    /// The configured node budget.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Cost recorded for `node` this frame, if it was pushed.
    #[must_use]
    pub fn cost(&self, node: NodeId) -> Option<f64> {
        self.costs.get(&node).copied()
    }

    /// Nodes queued for expansion this frame, in push order.
    #[must_use]
    pub fn expandable(&self) -> &[NodeId] {
        &self.expandable
    }

    /// Nodes queued for collapse this frame, in push order.
    #[must_use]
    pub fn collapsible(&self) -> &[NodeId] {
        &self.collapsible
    }

    fn span_cost(&self, y1: i64, y2: i64) -> f64 {
        if y1 > self.max_y || y2 < 0 {
            0.0
        } else {
            (y2.min(self.max_y) - y1.max(0)) as f64
        }
    }

    fn cost_of(&self, node: NodeId) -> f64 {
        self.costs.get(&node).copied().unwrap_or(0.0)
    }

    /// Collapses and expands queued nodes to approach the budget.
    ///
    /// Cheapest collapsible nodes are dropped first while the tree is over
    /// budget. Then the most valuable terminals are expanded while there is
    /// room; when there is not, a collapsible node cheaper than the
    /// candidate is dropped to make room. Stops as soon as the best
    /// remaining expansion is worth no more than something already
    /// collapsed. Returns `true` if the tree changed. Queues are cleared.
    pub fn apply(&mut self, tree: &mut NodeStore, expander: &mut dyn NodeExpander) -> bool {
        let mut collapsible = core::mem::take(&mut self.collapsible);
        let mut expandable = core::mem::take(&mut self.expandable);
        let by_cost = |a: &NodeId, b: &NodeId| {
            self.cost_of(*a)
                .total_cmp(&self.cost_of(*b))
                .then_with(|| a.cmp(b))
        };
        collapsible.sort_by(by_cost);
        expandable.sort_by(by_cost);

        let mut changed = false;
        let mut collapse_cost = f64::NEG_INFINITY;
        let mut next_collapse = 0;

        while next_collapse < collapsible.len() && tree.live_count() > self.budget {
            let node = collapsible[next_collapse];
            next_collapse += 1;
            collapse_cost = self.cost_of(node);
            if tree.is_alive(node) {
                tree.remove_children(node);
            }
            changed = true;
        }

        while let Some(&node) = expandable.last() {
            let cost = self.cost_of(node);
            if cost <= collapse_cost {
                break;
            }
            if tree.live_count() + self.expected_children < self.budget {
                expandable.pop();
                if tree.is_alive(node) && tree.child_count(node) == 0 {
                    expander.expand(tree, node);
                    changed = true;
                }
            } else if next_collapse < collapsible.len()
                && self.cost_of(collapsible[next_collapse]) < cost
            {
                let victim = collapsible[next_collapse];
                next_collapse += 1;
                collapse_cost = self.cost_of(victim);
                if tree.is_alive(victim) {
                    tree.remove_children(victim);
                }
                changed = true;
            } else {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            live = tree.live_count(),
            budget = self.budget,
            collapsed = next_collapse,
            changed,
            "expansion policy applied"
        );

        self.costs.clear();
        changed
    }
}

impl ExpansionPolicy for BudgetPolicy {
    fn push_node(&mut self, tree: &NodeStore, node: NodeId, y1: i64, y2: i64, class: NodeClass) {
        let mut cost = self.span_cost(y1, y2);
        let parent_cost = tree.parent(node).and_then(|p| self.cost(p));
        match parent_cost {
            Some(parent_cost) if cost >= parent_cost => {
                cost = parent_cost;
                if class == NodeClass::Terminal {
                    self.expandable.push(node);
                }
            }
            _ => match class {
                NodeClass::Terminal => self.expandable.push(node),
                NodeClass::Collapsible => self.collapsible.push(node),
            },
        }
        self.costs.insert(node, cost);
    }
}
