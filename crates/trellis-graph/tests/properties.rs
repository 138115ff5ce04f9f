//! Property-based tests for augmentation invariants.
//!
//! These hold for any input graph and any configuration:
//! - Committed edges are symmetric, loop-free and new
//! - Per-node and global caps are respected
//! - Every artificial edge spans exactly two hops when committed
//! - Ranking and augmentation are deterministic

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use trellis_core::{AugmentConfig, EdgeKey, NodeId};
use trellis_graph::{augment, rank_nodes, two_hop_candidates, GraphStore};

/// Random edge lists over a small id space so two-hop structure is common.
fn arb_edges() -> impl Strategy<Value = Vec<(NodeId, NodeId)>> {
    prop::collection::vec((-4i64..10, -4i64..10), 1..40)
}

fn arb_config() -> impl Strategy<Value = AugmentConfig> {
    (0usize..4, 0usize..70, 0usize..4, 0usize..5).prop_map(
        |(per_node, target, threshold, hops)| AugmentConfig {
            per_node_edge_limit: per_node,
            global_edge_target: target,
            triangle_score_threshold: threshold,
            local_betweenness_hops: hops,
            time_limit_secs: None,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn committed_edges_are_symmetric_new_and_loop_free(
        edges in arb_edges(),
        config in arb_config(),
    ) {
        let original = GraphStore::from_edges(edges);
        let mut graph = original.clone();
        let report = augment(&mut graph, &config).unwrap();

        let mut seen = HashSet::new();
        for &(u, v) in &report.artificial_edges {
            prop_assert_ne!(u, v);
            prop_assert!(graph.neighbors(u).contains(&v));
            prop_assert!(graph.neighbors(v).contains(&u));
            prop_assert!(!original.has_edge(u, v), "edge {}-{} already existed", u, v);
            prop_assert!(seen.insert(EdgeKey::new(u, v)), "edge {}-{} committed twice", u, v);
        }

        prop_assert_eq!(
            graph.edge_count(),
            original.edge_count() + report.artificial_edges.len()
        );
    }

    #[test]
    fn caps_are_respected(edges in arb_edges(), config in arb_config()) {
        let mut graph = GraphStore::from_edges(edges);
        let before = graph.edge_count();
        let report = augment(&mut graph, &config).unwrap();

        let mut incident: HashMap<NodeId, usize> = HashMap::new();
        for &(u, v) in &report.artificial_edges {
            *incident.entry(u).or_default() += 1;
            *incident.entry(v).or_default() += 1;
        }
        for (node, count) in incident {
            prop_assert!(
                count <= config.per_node_edge_limit,
                "node {} has {} artificial edges", node, count
            );
        }

        if before < config.global_edge_target {
            prop_assert!(graph.edge_count() <= config.global_edge_target);
        } else {
            prop_assert!(report.artificial_edges.is_empty());
        }
    }

    #[test]
    fn artificial_edges_span_two_hops(edges in arb_edges(), config in arb_config()) {
        let original = GraphStore::from_edges(edges);
        let mut graph = original.clone();
        let report = augment(&mut graph, &config).unwrap();

        // Replay commits in order; each must be a two-hop candidate of its
        // anchor in the graph as it stood at that moment.
        let mut replay = original;
        for &(anchor, candidate) in &report.artificial_edges {
            prop_assert!(
                two_hop_candidates(&replay, anchor).contains(&candidate),
                "{} was not two hops from {}", candidate, anchor
            );
            replay.add_edge(anchor, candidate).unwrap();
        }
    }

    #[test]
    fn ranking_is_deterministic(edges in arb_edges(), threshold in 0usize..4) {
        let graph = GraphStore::from_edges(edges);
        let first = rank_nodes(&graph, threshold);
        let second = rank_nodes(&graph, threshold);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), graph.node_count());
        prop_assert!(first.windows(2).all(|w| w[0].qualifying >= w[1].qualifying));
    }

    #[test]
    fn augmentation_is_deterministic(edges in arb_edges(), config in arb_config()) {
        let mut a = GraphStore::from_edges(edges.clone());
        let mut b = GraphStore::from_edges(edges);

        let first = augment(&mut a, &config).unwrap();
        let second = augment(&mut b, &config).unwrap();

        prop_assert_eq!(first.artificial_edges, second.artificial_edges);
        prop_assert_eq!(first.outcome, second.outcome);
    }
}
