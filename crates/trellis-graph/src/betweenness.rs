//! Local betweenness approximation.
//!
//! Exact betweenness needs every shortest path in the whole graph. Here we
//! only look at a bounded neighborhood of one anchor node and only at paths
//! with the anchor as an endpoint: for every ordered pair `(anchor, x)` and
//! `(x, anchor)` in the subgraph we pick ONE shortest path and count how
//! often each node appears strictly inside it.
//!
//! # Tie-break
//!
//! When several shortest paths exist, the chosen one is the
//! lexicographically smallest sequence of node ids. It is found with a BFS
//! from the destination (distances) followed by a greedy walk from the
//! source that always steps to the smallest-id neighbor one hop closer.
//! `(a, b)` and `(b, a)` can therefore resolve to different paths.
//!
//! Pairs with no path between them contribute nothing.

use crate::graph::GraphStore;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};
use trellis_core::NodeId;

const UNREACHABLE: usize = usize::MAX;

/// Interior-vertex counts over the anchor's shortest paths.
///
/// The chosen paths do not depend on which candidate is being scored, so
/// they are computed once and every candidate is a lookup.
#[derive(Debug, Default, Clone)]
pub struct LocalBetweenness {
    interior_counts: HashMap<NodeId, usize>,
    paths: usize,
}

impl LocalBetweenness {
    /// Computes the chosen shortest paths for `node` within `subgraph`.
    pub fn new(subgraph: &GraphStore, node: NodeId) -> Self {
        let Some(anchor) = subgraph.get_index(node) else {
            return Self::default();
        };
        let graph = &subgraph.graph;
        let to_anchor = bfs_distances(graph, anchor);

        let others: Vec<NodeIndex> = graph.node_indices().filter(|&i| i != anchor).collect();

        // One BFS per destination; the subgraph is frozen, so these run in parallel.
        let interiors: Vec<Vec<NodeIndex>> = others
            .par_iter()
            .flat_map_iter(|&other| {
                let to_other = bfs_distances(graph, other);
                let outbound = shortest_path(graph, anchor, other, &to_other);
                let inbound = shortest_path(graph, other, anchor, &to_anchor);
                outbound.into_iter().chain(inbound).map(interior)
            })
            .collect();

        let mut interior_counts: HashMap<NodeId, usize> = HashMap::new();
        for path in &interiors {
            for &index in path {
                *interior_counts.entry(graph[index]).or_default() += 1;
            }
        }

        Self {
            interior_counts,
            paths: interiors.len(),
        }
    }

    /// Number of chosen paths with `candidate` as an interior vertex.
    pub fn score(&self, candidate: NodeId) -> usize {
        self.interior_counts.get(&candidate).copied().unwrap_or(0)
    }

    /// Number of ordered pairs that had a path.
    pub fn path_count(&self) -> usize {
        self.paths
    }
}

/// One-shot local betweenness of `candidate` relative to `node`.
pub fn betweenness_score(subgraph: &GraphStore, node: NodeId, candidate: NodeId) -> usize {
    LocalBetweenness::new(subgraph, node).score(candidate)
}

/// Hop distance from every node to `target`.
fn bfs_distances(graph: &UnGraph<NodeId, ()>, target: NodeIndex) -> Vec<usize> {
    let mut dist = vec![UNREACHABLE; graph.node_count()];
    let mut queue = VecDeque::new();

    dist[target.index()] = 0;
    queue.push_back(target);

    while let Some(current) = queue.pop_front() {
        let next = dist[current.index()] + 1;
        for neighbor in graph.neighbors(current) {
            if dist[neighbor.index()] == UNREACHABLE {
                dist[neighbor.index()] = next;
                queue.push_back(neighbor);
            }
        }
    }

    dist
}

/// Lexicographically smallest shortest path from `src` to `dst`, given
/// distances to `dst`.
fn shortest_path(
    graph: &UnGraph<NodeId, ()>,
    src: NodeIndex,
    dst: NodeIndex,
    dist_to_dst: &[usize],
) -> Option<Vec<NodeIndex>> {
    if dist_to_dst[src.index()] == UNREACHABLE {
        return None;
    }

    let mut path = vec![src];
    let mut current = src;

    while current != dst {
        let closer = dist_to_dst[current.index()] - 1;
        current = graph
            .neighbors(current)
            .filter(|n| dist_to_dst[n.index()] == closer)
            .min_by_key(|n| graph[*n])?;
        path.push(current);
    }

    Some(path)
}

fn interior(path: Vec<NodeIndex>) -> Vec<NodeIndex> {
    match path.len() {
        0..=2 => Vec::new(),
        n => path[1..n - 1].to_vec(),
    }
}
