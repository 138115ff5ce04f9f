//! Common-neighbor (triangle) scoring.
//!
//! Closing the edge `node - candidate` completes one triangle per common
//! neighbor, so the score is the size of the neighbor-set intersection.
//! Scores are read from the current graph: edges committed earlier in a
//! run raise the scores seen later.

use crate::graph::GraphStore;
use std::collections::BTreeSet;
use trellis_core::NodeId;

/// Number of common neighbors of `node` and `candidate`.
pub fn triangle_score(graph: &GraphStore, node: NodeId, candidate: NodeId) -> usize {
    TriangleScorer::new(graph, node).score(candidate)
}

/// Scores many candidates against one anchor, reusing the anchor's
/// neighbor set.
#[derive(Debug)]
pub struct TriangleScorer<'g> {
    graph: &'g GraphStore,
    anchor_neighbors: BTreeSet<NodeId>,
}

impl<'g> TriangleScorer<'g> {
    pub fn new(graph: &'g GraphStore, node: NodeId) -> Self {
        Self {
            graph,
            anchor_neighbors: graph.neighbors(node),
        }
    }

    pub fn score(&self, candidate: NodeId) -> usize {
        self.graph
            .neighbor_ids(candidate)
            .filter(|n| self.anchor_neighbors.contains(n))
            .count()
    }
}
