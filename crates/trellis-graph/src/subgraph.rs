//! Bounded k-hop neighborhood extraction.
//!
//! Breadth-first expansion from a single node that stops after exactly `k`
//! rounds, however large the graph is. The result is the induced subgraph
//! on everything visited, materialised as its own [`GraphStore`] so
//! downstream scoring cannot see edges outside the neighborhood.

use crate::graph::GraphStore;
use std::collections::BTreeSet;
use trellis_core::NodeId;

/// Extracts the subgraph induced on all nodes within `k` hops of `node`.
///
/// An absent node yields an empty graph; `k = 0` yields just `node`.
pub fn extract_k_hop(graph: &GraphStore, node: NodeId, k: usize) -> GraphStore {
    if !graph.contains(node) {
        return GraphStore::new();
    }

    let mut visited: BTreeSet<NodeId> = BTreeSet::from([node]);
    let mut frontier: BTreeSet<NodeId> = BTreeSet::from([node]);

    for _ in 0..k {
        let next: BTreeSet<NodeId> = frontier
            .iter()
            .flat_map(|&n| graph.neighbor_ids(n))
            .filter(|n| !visited.contains(n))
            .collect();

        if next.is_empty() {
            break;
        }

        visited.extend(next.iter().copied());
        frontier = next;
    }

    graph.induced(&visited)
}
