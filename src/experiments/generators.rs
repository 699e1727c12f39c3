//! Deterministic graph generators for tests and benchmarks.
//!
//! All generators take the rng by reference, so a fixed seed makes an entire
//! experiment suite reproducible.

use crate::datastr::graph::{first_out_graph::OwnedGraph, Link, NodeId, Weight};
use rand::prelude::*;
use std::collections::HashSet;

fn random_weight(rng: &mut StdRng, min_weight: f64, max_weight: f64) -> Weight {
    Weight::new(rng.gen_range(min_weight..max_weight))
}

/// Random sparse digraph with `num_arcs` arcs.
/// A random spanning tree comes first so every vertex is reachable from the
/// tree root, the remaining arcs are uniform random non-parallel arcs.
pub fn random_sparse(num_nodes: usize, num_arcs: usize, min_weight: f64, max_weight: f64, rng: &mut StdRng) -> OwnedGraph {
    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); num_nodes];
    let mut arcs: HashSet<(usize, usize)> = HashSet::with_capacity(num_arcs);

    let mut permutation: Vec<usize> = (0..num_nodes).collect();
    permutation.shuffle(rng);

    for position in 1..num_nodes {
        let parent = permutation[rng.gen_range(0..position)];
        let child = permutation[position];
        adjacency[parent].push(Link {
            node: child as NodeId,
            weight: random_weight(rng, min_weight, max_weight),
        });
        arcs.insert((parent, child));
    }

    let mut remaining = num_arcs.saturating_sub(num_nodes.saturating_sub(1));
    let mut attempts = 0;
    while remaining > 0 && attempts < num_arcs * 10 {
        let tail = rng.gen_range(0..num_nodes);
        let head = rng.gen_range(0..num_nodes);
        if tail != head && arcs.insert((tail, head)) {
            adjacency[tail].push(Link {
                node: head as NodeId,
                weight: random_weight(rng, min_weight, max_weight),
            });
            remaining -= 1;
        }
        attempts += 1;
    }

    OwnedGraph::from_adjacency_lists(adjacency)
}

/// 4-connected grid with arcs in both directions.
pub fn grid(rows: usize, cols: usize, min_weight: f64, max_weight: f64, rng: &mut StdRng) -> OwnedGraph {
    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); rows * cols];
    let idx = |row: usize, col: usize| row * cols + col;

    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                adjacency[idx(row, col)].push(Link {
                    node: idx(row, col + 1) as NodeId,
                    weight: random_weight(rng, min_weight, max_weight),
                });
                adjacency[idx(row, col + 1)].push(Link {
                    node: idx(row, col) as NodeId,
                    weight: random_weight(rng, min_weight, max_weight),
                });
            }
            if row + 1 < rows {
                adjacency[idx(row, col)].push(Link {
                    node: idx(row + 1, col) as NodeId,
                    weight: random_weight(rng, min_weight, max_weight),
                });
                adjacency[idx(row + 1, col)].push(Link {
                    node: idx(row, col) as NodeId,
                    weight: random_weight(rng, min_weight, max_weight),
                });
            }
        }
    }

    OwnedGraph::from_adjacency_lists(adjacency)
}

/// Complete digraph, mostly useful to exercise dense corner cases.
pub fn complete(num_nodes: usize, min_weight: f64, max_weight: f64, rng: &mut StdRng) -> OwnedGraph {
    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); num_nodes];
    for tail in 0..num_nodes {
        for head in 0..num_nodes {
            if tail != head {
                adjacency[tail].push(Link {
                    node: head as NodeId,
                    weight: random_weight(rng, min_weight, max_weight),
                });
            }
        }
    }
    OwnedGraph::from_adjacency_lists(adjacency)
}

/// Scale-free graph after Barabási-Albert: a seed clique of `seed_nodes`
/// vertices, every further vertex attaches to `arcs_per_node` existing ones
/// with probability proportional to their degree. Arcs go both ways.
pub fn scale_free(num_nodes: usize, seed_nodes: usize, arcs_per_node: usize, min_weight: f64, max_weight: f64, rng: &mut StdRng) -> OwnedGraph {
    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); num_nodes];
    let mut degrees = vec![0usize; num_nodes];

    for tail in 0..seed_nodes.min(num_nodes) {
        for head in (tail + 1)..seed_nodes.min(num_nodes) {
            adjacency[tail].push(Link {
                node: head as NodeId,
                weight: random_weight(rng, min_weight, max_weight),
            });
            adjacency[head].push(Link {
                node: tail as NodeId,
                weight: random_weight(rng, min_weight, max_weight),
            });
            degrees[tail] += 1;
            degrees[head] += 1;
        }
    }

    for new_node in seed_nodes.min(num_nodes)..num_nodes {
        let total_degree: usize = degrees[..new_node].iter().sum();
        let mut targets: HashSet<usize> = HashSet::new();

        while targets.len() < arcs_per_node && targets.len() < new_node {
            let threshold = rng.gen::<f64>() * total_degree as f64;
            let mut cumulative = 0.0;
            for candidate in 0..new_node {
                cumulative += degrees[candidate] as f64;
                if cumulative >= threshold {
                    targets.insert(candidate);
                    break;
                }
            }
        }

        for &target in &targets {
            adjacency[new_node].push(Link {
                node: target as NodeId,
                weight: random_weight(rng, min_weight, max_weight),
            });
            adjacency[target].push(Link {
                node: new_node as NodeId,
                weight: random_weight(rng, min_weight, max_weight),
            });
            degrees[new_node] += 1;
            degrees[target] += 1;
        }
    }

    OwnedGraph::from_adjacency_lists(adjacency)
}
