//! Two-hop candidate generation.
//!
//! A candidate for `node` is any node reachable through exactly one
//! intermediate neighbor that is neither `node` itself nor already one of
//! its neighbors. Nothing farther than two hops is ever proposed.

use crate::graph::GraphStore;
use std::collections::BTreeSet;
use trellis_core::NodeId;

/// Returns the two-hop candidates of `node`, in ascending id order.
///
/// The ordering is the tie-break order used when ranking candidates.
pub fn two_hop_candidates(graph: &GraphStore, node: NodeId) -> BTreeSet<NodeId> {
    let one_hop = graph.neighbors(node);

    let mut two_hop: BTreeSet<NodeId> = one_hop
        .iter()
        .flat_map(|&neighbor| graph.neighbor_ids(neighbor))
        .collect();

    two_hop.retain(|candidate| *candidate != node && !one_hop.contains(candidate));
    two_hop
}
