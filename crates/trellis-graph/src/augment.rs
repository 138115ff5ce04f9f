//! Augmentation orchestrator.
//!
//! Drives a run end to end:
//!
//! 1. Rank every node by how many of its two-hop candidates already meet
//!    the triangle threshold. The ranking is computed once, on the graph as
//!    loaded, and never revisited.
//! 2. Visit nodes in ranked order. Each node goes through phase 1
//!    (triangle closing) and, if it still has room, phase 2 (local
//!    betweenness fill).
//! 3. Every accepted edge is committed to the graph before the next
//!    candidate is looked at, so later scoring sees earlier commits.
//!
//! Scoring within a phase only reads the graph and runs on the rayon pool;
//! commits are strictly sequential.

use crate::betweenness::LocalBetweenness;
use crate::budget::BudgetTracker;
use crate::candidates::two_hop_candidates;
use crate::graph::{GraphStore, Result};
use crate::stats::{AugmentStats, RunOutcome};
use crate::subgraph::extract_k_hop;
use crate::triangle::TriangleScorer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, info, trace};
use trellis_core::{AugmentConfig, EdgeKey, NodeId};

/// A node's position in the processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedNode {
    pub node: NodeId,
    /// Two-hop candidates whose triangle score meets the threshold.
    pub qualifying: usize,
}

/// Ranks nodes by qualifying triangle candidates, descending.
///
/// Ties keep node insertion order, so repeated calls on the same graph
/// return the same ranking.
pub fn rank_nodes(graph: &GraphStore, threshold: usize) -> Vec<RankedNode> {
    let nodes: Vec<NodeId> = graph.nodes().collect();

    let mut ranked: Vec<RankedNode> = nodes
        .par_iter()
        .map(|&node| {
            let scorer = TriangleScorer::new(graph, node);
            let qualifying = two_hop_candidates(graph, node)
                .into_iter()
                .filter(|&candidate| scorer.score(candidate) >= threshold)
                .count();
            RankedNode { node, qualifying }
        })
        .collect();

    // Stable sort keeps insertion order among equal counts.
    ranked.sort_by(|a, b| b.qualifying.cmp(&a.qualifying));
    ranked
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentReport {
    /// Committed edges as `(anchor, candidate)`, in commit order.
    pub artificial_edges: Vec<(NodeId, NodeId)>,
    pub stats: AugmentStats,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Triangle,
    Betweenness,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Triangle => "triangle",
            Phase::Betweenness => "betweenness",
        }
    }
}

type ProgressFn<'g> = Box<dyn FnMut(usize, usize) + 'g>;

/// Run-scoped augmentation state.
///
/// Holds the graph mutably for the lifetime of the run together with the
/// budget, the used-edge set and the statistics. Nothing is shared between
/// runs.
pub struct Augmenter<'g> {
    graph: &'g mut GraphStore,
    config: AugmentConfig,
    budget: BudgetTracker,
    used_edges: HashSet<EdgeKey>,
    artificial: Vec<(NodeId, NodeId)>,
    stats: AugmentStats,
    started: Instant,
    deadline: Option<Instant>,
    progress: Option<ProgressFn<'g>>,
}

impl<'g> Augmenter<'g> {
    pub fn new(graph: &'g mut GraphStore, config: &AugmentConfig) -> Self {
        let edges_before = graph.edge_count();
        let started = Instant::now();

        Self {
            budget: BudgetTracker::new(config, edges_before),
            config: config.clone(),
            used_edges: HashSet::new(),
            artificial: Vec::new(),
            stats: AugmentStats {
                edges_before,
                ..AugmentStats::default()
            },
            started,
            deadline: config.time_limit().map(|limit| started + limit),
            progress: None,
            graph,
        }
    }

    /// Registers a callback invoked after each node with
    /// `(nodes_processed, nodes_total)`.
    pub fn with_progress(mut self, callback: impl FnMut(usize, usize) + 'g) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Stops the run at `deadline`, replacing any limit from the config.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Runs augmentation to completion, budget exhaustion or deadline.
    pub fn run(mut self) -> Result<AugmentReport> {
        let ranking = rank_nodes(self.graph, self.config.triangle_score_threshold);
        let total = ranking.len();

        info!(
            "Augmenting {} nodes / {} edges (allowance {}, {} per node)",
            total,
            self.stats.edges_before,
            self.budget.remaining_global(),
            self.config.per_node_edge_limit
        );

        let mut outcome = RunOutcome::Completed;

        for ranked in &ranking {
            if let Some(halt) = self.check_halt() {
                outcome = halt;
                break;
            }

            let halted = self.augment_node(ranked.node)?;

            self.stats.nodes_processed += 1;
            if let Some(progress) = self.progress.as_mut() {
                progress(self.stats.nodes_processed, total);
            }

            if let Some(halt) = halted {
                outcome = halt;
                break;
            }
        }

        Ok(self.finish(outcome))
    }

    /// Global checkpoint, evaluated before each node and each commit.
    fn check_halt(&self) -> Option<RunOutcome> {
        if !self.budget.can_add_global() {
            return Some(RunOutcome::BudgetExhausted);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(RunOutcome::DeadlineReached),
            _ => None,
        }
    }

    fn is_open(&self, node: NodeId, candidate: NodeId) -> bool {
        !self.graph.has_edge(node, candidate)
            && !self.used_edges.contains(&EdgeKey::new(node, candidate))
    }

    fn augment_node(&mut self, node: NodeId) -> Result<Option<RunOutcome>> {
        if !self.budget.can_add_for_node(node) {
            debug!("Node {} already at its cap, skipping", node);
            return Ok(None);
        }

        let candidates = two_hop_candidates(self.graph, node);
        if candidates.is_empty() {
            return Ok(None);
        }

        // Phase 1: triangle closing
        let mut triangle = self.score_triangles(node, &candidates);
        self.stats.triangle_candidates_considered += triangle.len();
        triangle.retain(|&(_, score)| score >= self.config.triangle_score_threshold);
        self.stats.triangle_candidates_qualified += triangle.len();
        sort_by_score(&mut triangle);

        debug!(
            "Node {}: {} candidates, {} pass triangle threshold",
            node,
            candidates.len(),
            triangle.len()
        );

        if let Some(halt) = self.commit_ranked(node, &triangle, Phase::Triangle)? {
            return Ok(Some(halt));
        }

        // Phase 2: betweenness fill
        if !self.budget.can_add_for_node(node) {
            return Ok(None);
        }
        if let Some(halt) = self.check_halt() {
            return Ok(Some(halt));
        }

        let remaining: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&candidate| self.is_open(node, candidate))
            .collect();
        if remaining.is_empty() {
            return Ok(None);
        }

        let subgraph = extract_k_hop(self.graph, node, self.config.local_betweenness_hops);
        let local = LocalBetweenness::new(&subgraph, node);

        let mut bridging: Vec<(NodeId, usize)> = remaining
            .iter()
            .map(|&candidate| (candidate, local.score(candidate)))
            .collect();
        self.stats.betweenness_candidates_considered += bridging.len();
        bridging.retain(|&(_, score)| score > 0);
        self.stats.betweenness_candidates_qualified += bridging.len();
        sort_by_score(&mut bridging);

        debug!(
            "Node {}: {}-hop subgraph has {} nodes, {} paths, {} bridging candidates",
            node,
            self.config.local_betweenness_hops,
            subgraph.node_count(),
            local.path_count(),
            bridging.len()
        );

        self.commit_ranked(node, &bridging, Phase::Betweenness)
    }

    fn score_triangles(
        &self,
        node: NodeId,
        candidates: &BTreeSet<NodeId>,
    ) -> Vec<(NodeId, usize)> {
        let open: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&candidate| self.is_open(node, candidate))
            .collect();

        let scorer = TriangleScorer::new(self.graph, node);
        open.par_iter()
            .map(|&candidate| (candidate, scorer.score(candidate)))
            .collect()
    }

    /// Greedily commits ranked candidates until a cap or checkpoint stops it.
    fn commit_ranked(
        &mut self,
        node: NodeId,
        ranked: &[(NodeId, usize)],
        phase: Phase,
    ) -> Result<Option<RunOutcome>> {
        for &(candidate, score) in ranked {
            if let Some(halt) = self.check_halt() {
                return Ok(Some(halt));
            }
            if !self.budget.can_add_for_node(node) {
                break;
            }
            if !self.budget.can_add_for_node(candidate) {
                self.stats.saturated_skips += 1;
                continue;
            }
            if !self.is_open(node, candidate) {
                continue;
            }

            self.commit(node, candidate)?;
            trace!(
                "Committed {} - {} ({} score {})",
                node,
                candidate,
                phase.as_str(),
                score
            );

            match phase {
                Phase::Triangle => {
                    self.stats.phase1_edges += 1;
                    self.stats.triangle_candidates_selected += 1;
                }
                Phase::Betweenness => {
                    self.stats.phase2_edges += 1;
                    self.stats.betweenness_candidates_selected += 1;
                }
            }
        }

        Ok(None)
    }

    fn commit(&mut self, node: NodeId, candidate: NodeId) -> Result<()> {
        self.graph.add_edge(node, candidate)?;

        let key = EdgeKey::new(node, candidate);
        self.used_edges.insert(key);
        self.budget.record(key);
        self.artificial.push((node, candidate));
        Ok(())
    }

    fn finish(mut self, outcome: RunOutcome) -> AugmentReport {
        self.stats.edges_after = self.graph.edge_count();
        self.stats.artificial_edges = self.budget.added_total();
        self.stats.edges_added_per_node = self
            .budget
            .per_node_counts()
            .iter()
            .map(|(&node, &count)| (node, count))
            .collect();
        self.stats.nodes_augmented = self.stats.edges_added_per_node.len();
        self.stats.elapsed_ms = self.started.elapsed().as_millis() as u64;

        info!("Augmentation {}: {}", outcome, self.stats.summary());

        AugmentReport {
            artificial_edges: self.artificial,
            stats: self.stats,
            outcome,
        }
    }
}

/// Descending by score; equal scores keep candidate order.
fn sort_by_score(scored: &mut [(NodeId, usize)]) {
    scored.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Runs one augmentation pass over `graph` with `config`.
pub fn augment(graph: &mut GraphStore, config: &AugmentConfig) -> Result<AugmentReport> {
    Augmenter::new(graph, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(per_node: usize, target: usize) -> AugmentConfig {
        AugmentConfig {
            per_node_edge_limit: per_node,
            global_edge_target: target,
            ..AugmentConfig::default()
        }
    }

    /// Two 4-cycles sharing node 1: 1-2-3-4-1 and 1-5-6-7-1, plus 2-5.
    fn bowtie() -> GraphStore {
        GraphStore::from_edges(vec![
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 1),
            (1, 5),
            (5, 6),
            (6, 7),
            (7, 1),
            (2, 5),
        ])
    }

    #[test]
    fn test_rank_counts_qualifying_candidates() {
        // Square: opposite corners share two neighbors.
        let graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        let ranking = rank_nodes(&graph, 2);

        assert_eq!(ranking.len(), 4);
        assert!(ranking.iter().all(|r| r.qualifying == 1));
        let order: Vec<NodeId> = ranking.iter().map(|r| r.node).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_orders_descending_with_stable_ties() {
        // 1, 10 and 3 each sit opposite two square corners; 2 and 4 one; 5 and 6 none.
        let graph = GraphStore::from_edges(vec![
            (5, 6),
            (1, 2),
            (2, 10),
            (10, 4),
            (4, 1),
            (3, 2),
            (3, 4),
        ]);
        let ranking = rank_nodes(&graph, 2);

        assert_eq!(ranking[0].node, 1);
        assert_eq!(ranking[0].qualifying, 2);
        assert_eq!(ranking.last().map(|r| r.qualifying), Some(0));
        // 5 and 6 tie at zero and keep insertion order.
        let tail: Vec<NodeId> = ranking.iter().rev().take(2).map(|r| r.node).collect();
        assert_eq!(tail, vec![6, 5]);
    }

    #[test]
    fn test_square_closes_diagonals_in_phase_one() {
        let mut graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        let report = augment(&mut graph, &config(10, 100)).unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.artificial_edges, vec![(1, 3), (2, 4)]);
        assert_eq!(report.stats.phase1_edges, 2);
        assert_eq!(report.stats.phase2_edges, 0);
        assert_eq!(report.stats.edges_after, 6);
        assert!(graph.has_edge(3, 1));
        assert!(graph.has_edge(4, 2));
    }

    #[test]
    fn test_global_budget_stops_run() {
        let mut graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        let report = augment(&mut graph, &config(10, 5)).unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(report.artificial_edges.len(), 1);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_input_above_target_adds_nothing() {
        let mut graph = bowtie();
        let before = graph.edge_count();
        let report = augment(&mut graph, &config(10, 3)).unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert!(report.artificial_edges.is_empty());
        assert_eq!(graph.edge_count(), before);
        assert_eq!(report.stats.nodes_processed, 0);
    }

    #[test]
    fn test_per_node_cap_counts_both_endpoints() {
        let mut graph = bowtie();
        let report = augment(&mut graph, &config(1, 1_000)).unwrap();

        for (&node, &count) in &report.stats.edges_added_per_node {
            assert!(count <= 1, "node {node} got {count} artificial edges");
        }
        let mut incident = std::collections::HashMap::new();
        for &(u, v) in &report.artificial_edges {
            *incident.entry(u).or_insert(0) += 1;
            *incident.entry(v).or_insert(0) += 1;
        }
        assert!(incident.values().all(|&count| count <= 1));
    }

    #[test]
    fn test_zero_per_node_limit_is_a_no_op() {
        let mut graph = bowtie();
        let report = augment(&mut graph, &config(0, 1_000)).unwrap();
        assert!(report.artificial_edges.is_empty());
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[test]
    fn test_progress_callback_sees_every_node() {
        let mut graph = bowtie();
        let mut calls = Vec::new();
        let report = Augmenter::new(&mut graph, &config(10, 1_000))
            .with_progress(|done, total| calls.push((done, total)))
            .run()
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(calls.len(), 7);
        assert_eq!(calls.last(), Some(&(7, 7)));
    }

    #[test]
    fn test_progress_reported_for_node_that_halts() {
        // The allowance of one edge runs out while node 1 is processed.
        let mut graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        let mut calls = Vec::new();
        let report = Augmenter::new(&mut graph, &config(10, 5))
            .with_progress(|done, total| calls.push((done, total)))
            .run()
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(report.stats.nodes_processed, 1);
        assert_eq!(calls, vec![(1, 4)]);
    }

    #[test]
    fn test_passed_deadline_stops_before_first_node() {
        let mut graph = bowtie();
        let before = graph.edge_count();
        let report = Augmenter::new(&mut graph, &config(10, 1_000))
            .with_deadline(Instant::now())
            .run()
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::DeadlineReached);
        assert!(report.artificial_edges.is_empty());
        assert_eq!(report.stats.nodes_processed, 0);
        assert_eq!(graph.edge_count(), before);
    }

    #[test]
    fn test_generous_time_limit_completes() {
        let mut graph = GraphStore::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        let config = AugmentConfig {
            time_limit_secs: Some(3_600),
            ..config(10, 100)
        };
        let report = augment(&mut graph, &config).unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.artificial_edges, vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_stats_account_for_every_edge() {
        let mut graph = bowtie();
        let report = augment(&mut graph, &config(3, 1_000)).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.artificial_edges, report.artificial_edges.len());
        assert_eq!(stats.phase1_edges + stats.phase2_edges, stats.artificial_edges);
        assert_eq!(stats.edges_after, stats.edges_before + stats.artificial_edges);
        assert_eq!(
            stats.edges_added_per_node.values().sum::<usize>(),
            2 * stats.artificial_edges
        );
        assert!(stats.triangle_candidates_selected <= stats.triangle_candidates_qualified);
        assert!(stats.triangle_candidates_qualified <= stats.triangle_candidates_considered);
        assert!(stats.betweenness_candidates_selected <= stats.betweenness_candidates_qualified);
    }
}
