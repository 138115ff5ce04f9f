//! Core graph data structure.
//!
//! The GraphStore wraps a petgraph undirected graph and adds indexes for
//! fast lookups. It's the only structure the augmentation engine mutates;
//! every scorer reads from it.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet};
use trellis_core::{EdgeKey, GraphError, NodeId};

pub type Result<T> = std::result::Result<T, GraphError>;

/// Mutable undirected graph with symmetric adjacency.
///
/// Nodes are never removed. Parallel edges and self-loops are never stored,
/// so `edge_count` is the number of distinct undirected edges.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// The underlying petgraph graph. Node weights are the external ids.
    pub(crate) graph: UnGraph<NodeId, ()>,

    /// Maps external node ids to graph node indexes.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Normalised edge keys for O(1) membership checks.
    edge_index: HashSet<EdgeKey>,
}

impl GraphStore {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from an edge list.
    ///
    /// Endpoints become nodes in order of first appearance. Duplicate edges
    /// collapse into one and self-loops are dropped.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut store = Self::new();
        let mut self_loops = 0usize;

        for (u, v) in edges {
            store.add_node(u);
            store.add_node(v);
            if u == v {
                self_loops += 1;
                continue;
            }
            store.insert_edge(u, v);
        }

        if self_loops > 0 {
            tracing::warn!("Skipped {} self-loop edges in input", self_loops);
        }

        store
    }

    /// Adds a node, returning its index. Adding an existing id is a no-op.
    pub fn add_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&index) = self.id_index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id);
        self.id_index.insert(id, index);
        index
    }

    /// Adds the undirected edge `{u, v}`.
    ///
    /// Returns `Ok(true)` if the edge was inserted and `Ok(false)` if it
    /// was already present.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        if !self.contains(u) {
            return Err(GraphError::InvalidNode(u));
        }
        if !self.contains(v) {
            return Err(GraphError::InvalidNode(v));
        }
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        Ok(self.insert_edge(u, v))
    }

    /// Both endpoints must already be indexed.
    fn insert_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let (Some(&a), Some(&b)) = (self.id_index.get(&u), self.id_index.get(&v)) else {
            return false;
        };
        if !self.edge_index.insert(EdgeKey::new(u, v)) {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Returns true if the node is in the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Returns true if the undirected edge `{u, v}` exists.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_index.contains(&EdgeKey::new(u, v))
    }

    /// Returns the neighbor set of a node (empty if the node is absent).
    pub fn neighbors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.neighbor_ids(id).collect()
    }

    /// Iterates a node's neighbors without collecting them.
    pub fn neighbor_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.id_index
            .get(&id)
            .into_iter()
            .flat_map(move |&index| self.graph.neighbors(index))
            .map(move |index| self.graph[index])
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// Iterates edges in insertion order, for export.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()]))
    }

    /// Gets the graph index for a node id.
    pub fn get_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Builds the subgraph induced on `nodes`.
    ///
    /// Ids not present in this graph are ignored. Nodes are inserted in
    /// ascending id order so the result does not depend on how the caller
    /// collected them.
    pub fn induced(&self, nodes: &BTreeSet<NodeId>) -> GraphStore {
        let mut sub = GraphStore::new();
        for &id in nodes {
            if self.contains(id) {
                sub.add_node(id);
            }
        }

        for &id in nodes {
            for neighbor in self.neighbor_ids(id) {
                if id < neighbor && nodes.contains(&neighbor) {
                    sub.insert_edge(id, neighbor);
                }
            }
        }

        sub
    }
}
