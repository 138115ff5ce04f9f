//! Trellis Core - Shared types for graph augmentation
//!
//! This crate holds the pieces every other Trellis crate agrees on:
//! node identifiers, the undirected edge key, error types, the
//! whitespace-separated edge-list format and the run configuration.
//!
//! # Example
//!
//! ```no_run
//! use trellis_core::{read_edge_list, AugmentConfig};
//!
//! let edges = read_edge_list("citations.edgelist").unwrap();
//! let config = AugmentConfig::default();
//! println!("{} edges, cap {} per node", edges.len(), config.per_node_edge_limit);
//! ```

pub mod config;
pub mod edgelist;
pub mod error;
mod node;

pub use config::AugmentConfig;
pub use edgelist::{parse_edge_list, read_edge_list, save_edge_list, write_edge_list};
pub use error::{ConfigError, GraphError, ParseError};
pub use node::{EdgeKey, NodeId};
