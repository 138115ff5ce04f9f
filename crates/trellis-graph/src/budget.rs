//! Edge budget accounting for one augmentation run.
//!
//! Two limits gate every commit: a global allowance (how many artificial
//! edges fit under the edge-count target) and a per-node cap on artificial
//! edges incident to a node. Counters only grow; a new run starts a new
//! tracker.

use std::collections::HashMap;
use trellis_core::{AugmentConfig, EdgeKey, NodeId};

#[derive(Debug, Clone)]
pub struct BudgetTracker {
    /// Artificial edges allowed in this run.
    global_allowance: usize,
    per_node_limit: usize,
    added_total: usize,
    added_per_node: HashMap<NodeId, usize>,
}

impl BudgetTracker {
    /// Creates a tracker for a graph that starts with `edges_before` edges.
    ///
    /// If the graph already meets the target the allowance is zero.
    pub fn new(config: &AugmentConfig, edges_before: usize) -> Self {
        Self {
            global_allowance: config.global_edge_target.saturating_sub(edges_before),
            per_node_limit: config.per_node_edge_limit,
            added_total: 0,
            added_per_node: HashMap::new(),
        }
    }

    pub fn can_add_global(&self) -> bool {
        self.added_total < self.global_allowance
    }

    pub fn can_add_for_node(&self, node: NodeId) -> bool {
        self.added_for(node) < self.per_node_limit
    }

    /// Records one committed edge against the global counter and against
    /// both of its endpoints.
    pub fn record(&mut self, edge: EdgeKey) {
        self.added_total += 1;
        *self.added_per_node.entry(edge.low()).or_default() += 1;
        *self.added_per_node.entry(edge.high()).or_default() += 1;
    }

    pub fn added_total(&self) -> usize {
        self.added_total
    }

    pub fn added_for(&self, node: NodeId) -> usize {
        self.added_per_node.get(&node).copied().unwrap_or(0)
    }

    pub fn remaining_global(&self) -> usize {
        self.global_allowance.saturating_sub(self.added_total)
    }

    pub fn per_node_counts(&self) -> &HashMap<NodeId, usize> {
        &self.added_per_node
    }
}
