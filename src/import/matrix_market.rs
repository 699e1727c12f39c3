//! Parser for Matrix Market coordinate files.
//!
//! Handles general and symmetric matrices with real, integer or pattern
//! entries. Indices are 1-based in the file. Symmetric entries are mirrored
//! into both arc directions. Since the engine rejects negative weights,
//! negative entries are folded to their absolute value and zero entries are
//! read as 1.0; malformed or out-of-range lines are skipped.

use crate::datastr::graph::{first_out_graph::OwnedGraph, Graph, Link, NodeId, Weight};
use std::{
    fs::File,
    io::{BufRead, BufReader, Error, ErrorKind, Result},
    path::Path,
};

#[derive(Debug, Clone, Copy)]
pub struct MtxInfo {
    pub num_nodes: usize,
    pub num_arcs: usize,
    pub symmetric: bool,
    pub pattern: bool,
}

/// Read a graph from a `.mtx` file on disk.
pub fn read_graph<P: AsRef<Path>>(path: P) -> Result<(OwnedGraph, MtxInfo)> {
    parse_graph(BufReader::new(File::open(path)?))
}

/// Parse a graph from anything line-readable in Matrix Market coordinate form.
pub fn parse_graph<R: BufRead>(mut reader: R) -> Result<(OwnedGraph, MtxInfo)> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.starts_with("%%MatrixMarket") {
        return Err(Error::new(ErrorKind::InvalidData, "missing MatrixMarket header"));
    }
    let header = line.to_lowercase();
    let symmetric = header.contains("symmetric");
    let pattern = header.contains("pattern");

    // first line which is neither comment nor blank carries the dimensions
    let num_nodes;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::new(ErrorKind::UnexpectedEof, "missing dimension line"));
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let rows: usize = fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "invalid dimension line"))?;
        let cols: usize = fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "invalid dimension line"))?;
        num_nodes = rows.max(cols);
        break;
    }

    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); num_nodes];
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let tail: usize = match fields.next().and_then(|field| field.parse().ok()) {
            Some(index) => index,
            None => continue,
        };
        let head: usize = match fields.next().and_then(|field| field.parse().ok()) {
            Some(index) => index,
            None => continue,
        };
        if tail == 0 || head == 0 || tail > num_nodes || head > num_nodes {
            continue;
        }
        let (tail, head) = (tail - 1, head - 1);

        let mut weight = 1.0;
        if !pattern {
            if let Some(parsed) = fields.next().and_then(|field| field.parse::<f64>().ok()).filter(|parsed| !parsed.is_nan()) {
                weight = parsed;
            }
        }
        if weight < 0.0 {
            weight = -weight;
        }
        if weight == 0.0 {
            weight = 1.0;
        }

        adjacency[tail].push(Link {
            node: head as NodeId,
            weight: Weight::new(weight),
        });
        if symmetric && tail != head {
            adjacency[head].push(Link {
                node: tail as NodeId,
                weight: Weight::new(weight),
            });
        }
    }

    let graph = OwnedGraph::from_adjacency_lists(adjacency);
    let info = MtxInfo {
        num_nodes,
        num_arcs: graph.num_arcs(),
        symmetric,
        pattern,
    };
    Ok((graph, info))
}
