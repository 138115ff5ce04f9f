//! Error types shared across Trellis crates.

use crate::node::NodeId;
use thiserror::Error;

/// Errors raised while reading an edge list.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid node id '{token}'")]
    InvalidNodeId { line: usize, token: String },

    #[error("line {line}: expected two node ids")]
    MissingEndpoint { line: usize },
}

/// Errors raised by graph mutation.
///
/// During augmentation these indicate a logic defect: candidates are always
/// derived from existing adjacency, so neither should ever surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} is not in the graph")]
    InvalidNode(NodeId),

    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
