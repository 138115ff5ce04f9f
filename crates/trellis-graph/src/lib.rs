//! Trellis Graph - Edge augmentation for sparse graphs
//!
//! This crate owns the mutable graph and the engine that densifies it.
//! Given a sparse undirected graph (a citation network, say), it adds
//! edges between nodes that are two hops apart until a global edge target
//! or per-node caps are reached.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Node id lookups
//! - O(1) edge membership
//!
//! Candidates come from two-hop neighborhoods and are ranked by two
//! heuristics, one per phase:
//! - Phase 1: common-neighbor count (triangle closing)
//! - Phase 2: local betweenness inside a bounded k-hop subgraph
//!
//! # Example
//!
//! ```
//! use trellis_graph::{augment, GraphStore};
//! use trellis_core::AugmentConfig;
//!
//! // A square: opposite corners share two neighbors.
//! let mut graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
//! let report = augment(&mut graph, &AugmentConfig::default()).unwrap();
//!
//! assert_eq!(report.artificial_edges, vec![(1, 3), (2, 4)]);
//! assert_eq!(graph.edge_count(), 6);
//! ```

mod augment;
mod betweenness;
mod budget;
mod candidates;
mod graph;
mod stats;
mod subgraph;
mod triangle;

pub use augment::{augment, rank_nodes, AugmentReport, Augmenter, RankedNode};
pub use betweenness::{betweenness_score, LocalBetweenness};
pub use budget::BudgetTracker;
pub use candidates::two_hop_candidates;
pub use graph::GraphStore;
pub use stats::{AugmentStats, RunOutcome};
pub use subgraph::extract_k_hop;
pub use triangle::{triangle_score, TriangleScorer};
