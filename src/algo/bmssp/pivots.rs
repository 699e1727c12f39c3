//! Frontier pivot selection via a depth-bounded relaxation.
//!
//! Relaxes k steps out of the frontier, which settles every vertex whose
//! shortest path hangs below a frontier vertex within k arcs. Frontier
//! vertices whose predecessor subtree in that reach grew to at least k
//! vertices are the pivots: only they can root subtrees large enough to be
//! worth a recursive call, which bounds the branching of the level above.
//! If the reach outgrows k times the frontier, relaxing further is already
//! more expensive than recursing, so the whole frontier is returned as
//! pivots right away.

use super::*;
use std::collections::HashMap;

impl<'a, G: for<'b> LinkIterGraph<'b>> Solver<'a, G> {
    /// Returns the pivots and the full k-step reach (which always contains
    /// the frontier itself). Every vertex of an exhausted reach is marked
    /// complete, advisorily.
    pub(super) fn find_pivots(&mut self, bound: Weight, frontier: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut reach: HashSet<NodeId> = frontier.iter().copied().collect();
        let mut layer: Vec<NodeId> = frontier.to_vec();

        for _ in 0..self.params.k {
            let mut next_layer: Vec<NodeId> = Vec::new();
            for &tail in &layer {
                for link in self.graph.neighbor_iter(tail) {
                    if let Some(candidate) = self.try_relax(tail, link) {
                        if candidate < bound {
                            next_layer.push(link.node);
                        }
                    }
                }
            }
            next_layer.sort_unstable();
            next_layer.dedup();
            for &node in &next_layer {
                reach.insert(node);
            }

            // a reach this large carries enough subtree weight everywhere,
            // every frontier vertex counts as a pivot
            if reach.len() > self.params.k * frontier.len() {
                return (frontier.to_vec(), reach.into_iter().collect());
            }

            layer = next_layer;
        }

        // predecessor forest restricted to the reach: frontier vertices are
        // the roots, everything else hangs below its current predecessor
        let frontier_members: HashSet<NodeId> = frontier.iter().copied().collect();
        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &node in &reach {
            if frontier_members.contains(&node) {
                continue;
            }
            if let Some(parent) = self.predecessors[node as usize].value() {
                if parent != node && reach.contains(&parent) {
                    children.entry(parent).or_insert_with(Vec::new).push(node);
                }
            }
        }

        let mut pivots: Vec<NodeId> = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::with_capacity(reach.len());
        for &root in frontier {
            if !visited.insert(root) {
                continue;
            }
            // iterative traversal, the reach can contain long chains and the
            // visited set keeps equal-distance predecessor loops finite
            let mut subtree_size = 0;
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                subtree_size += 1;
                if let Some(child_nodes) = children.get(&node) {
                    for &child in child_nodes {
                        if visited.insert(child) {
                            stack.push(child);
                        }
                    }
                }
            }
            if subtree_size >= self.params.k {
                pivots.push(root);
            }
        }

        // at least one pivot, otherwise the level above cannot make progress
        if pivots.is_empty() {
            if let Some(&first) = frontier.first() {
                pivots.push(first);
            }
        }

        for &node in &reach {
            self.complete[node as usize] = true;
        }

        (pivots, reach.into_iter().collect())
    }
}
