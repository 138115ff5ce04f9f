//! Run statistics and outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trellis_core::NodeId;

/// How an augmentation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every ranked node was processed.
    Completed,
    /// The global edge allowance ran out.
    BudgetExhausted,
    /// The configured time limit passed.
    DeadlineReached,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::DeadlineReached => "deadline_reached",
        };
        write!(f, "{}", s)
    }
}

/// Counters collected over one run.
///
/// "Considered" counts candidates that were scored, "qualified" those that
/// passed the phase's filter, "selected" those committed as edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentStats {
    pub edges_before: usize,
    pub edges_after: usize,
    pub artificial_edges: usize,
    pub nodes_processed: usize,
    pub nodes_augmented: usize,

    /// Artificial edges incident to each node (both endpoints counted).
    pub edges_added_per_node: BTreeMap<NodeId, usize>,

    pub phase1_edges: usize,
    pub phase2_edges: usize,

    pub triangle_candidates_considered: usize,
    pub triangle_candidates_qualified: usize,
    pub triangle_candidates_selected: usize,

    pub betweenness_candidates_considered: usize,
    pub betweenness_candidates_qualified: usize,
    pub betweenness_candidates_selected: usize,

    /// Candidates skipped because their own per-node cap was full.
    pub saturated_skips: usize,

    pub elapsed_ms: u64,
}

impl AugmentStats {
    /// Returns a one-line summary suitable for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} -> {} edges (+{} artificial: {} triangle, {} betweenness) across {} nodes",
            self.edges_before,
            self.edges_after,
            self.artificial_edges,
            self.phase1_edges,
            self.phase2_edges,
            self.nodes_augmented
        )
    }
}
