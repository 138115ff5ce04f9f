//! Whitespace-separated edge-list format.
//!
//! One undirected edge per line, two integer node ids separated by
//! whitespace. Blank lines and anything after `#` are ignored, as are
//! extra columns (weights or attribute dicts some tools append).
//!
//! Loading is all-or-nothing: the first malformed line aborts the read.

use crate::error::ParseError;
use crate::node::NodeId;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses an edge list from any buffered reader.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<Vec<(NodeId, NodeId)>> {
    let mut edges = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };

        let mut tokens = content.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let second = tokens
            .next()
            .ok_or(ParseError::MissingEndpoint { line: line_no })?;

        edges.push((parse_node(first, line_no)?, parse_node(second, line_no)?));
    }

    tracing::debug!("Parsed {} edges", edges.len());
    Ok(edges)
}

fn parse_node(token: &str, line: usize) -> Result<NodeId> {
    token.parse::<NodeId>().map_err(|_| ParseError::InvalidNodeId {
        line,
        token: token.to_string(),
    })
}

/// Reads an edge-list file.
pub fn read_edge_list<P: AsRef<Path>>(path: P) -> Result<Vec<(NodeId, NodeId)>> {
    let file = File::open(path.as_ref())?;
    parse_edge_list(BufReader::new(file))
}

/// Writes edges as `"u v"` lines, preserving the given order.
pub fn write_edge_list<W, I>(writer: W, edges: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let mut out = BufWriter::new(writer);
    for (u, v) in edges {
        writeln!(out, "{} {}", u, v)?;
    }
    out.flush()
}

/// Writes an edge-list file, replacing any existing file at `path`.
pub fn save_edge_list<P, I>(path: P, edges: I) -> std::io::Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let file = File::create(path.as_ref())?;
    write_edge_list(file, edges)
}
