//! Node and edge identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node as it appears in the edge list.
pub type NodeId = i64;

/// An undirected edge, stored with the smaller endpoint first.
///
/// Two keys built from the same endpoints in either order compare equal,
/// which is what the used-edge set and the edge index rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    /// Creates a normalised key for the edge `{a, b}`.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// The smaller endpoint.
    pub fn low(&self) -> NodeId {
        self.0
    }

    /// The larger endpoint.
    pub fn high(&self) -> NodeId {
        self.1
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}
