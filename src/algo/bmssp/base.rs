//! The recursion's level 0: a size-capped Dijkstra.

use super::*;

impl<'a, G: for<'b> LinkIterGraph<'b>> Solver<'a, G> {
    /// Settle up to k+1 vertices of a singleton frontier below `bound` with a
    /// plain Dijkstra. If the cap is not hit, everything below `bound`
    /// reachable this way is settled and the bound comes back unchanged.
    /// Otherwise the largest settled distance becomes the improved bound and
    /// only the vertices strictly below it are reported settled.
    pub(super) fn base_case(&mut self, bound: Weight, frontier: Vec<NodeId>) -> (Weight, Vec<NodeId>) {
        let root = match frontier.first() {
            Some(&root) => root,
            None => return (bound, Vec::new()),
        };

        let mut settled: Vec<NodeId> = Vec::with_capacity(self.params.k + 1);

        self.base_queue.clear();
        self.base_queue.push(State {
            key: self.distances[root as usize],
            node: root,
        });

        while settled.len() < self.params.k + 1 {
            let node = match self.base_queue.pop() {
                Some(State { node, .. }) => node,
                None => break,
            };
            settled.push(node);
            self.complete[node as usize] = true;

            for link in self.graph.neighbor_iter(node) {
                if link.node == node {
                    continue;
                }
                let candidate = self.distances[node as usize] + link.weight;
                if candidate <= self.distances[link.node as usize] && candidate < bound {
                    // ties keep their first certifying predecessor, a strict
                    // improvement is the only thing allowed to rewrite it
                    if candidate < self.distances[link.node as usize] {
                        self.distances[link.node as usize] = candidate;
                        self.predecessors[link.node as usize] = InRangeOption::new(Some(node));
                    }

                    // ties can point back at an already settled vertex,
                    // it must not be settled a second time in this call
                    if settled.contains(&link.node) {
                        continue;
                    }
                    let next = State {
                        key: candidate,
                        node: link.node,
                    };
                    if self.base_queue.contains_index(next.as_index()) {
                        self.base_queue.decrease_key(next);
                    } else {
                        self.base_queue.push(next);
                    }
                }
            }
        }

        if settled.len() <= self.params.k {
            (bound, settled)
        } else {
            let cutoff = settled.iter().map(|&node| self.distances[node as usize]).max().unwrap();
            let below_cutoff = settled.into_iter().filter(|&node| self.distances[node as usize] < cutoff).collect();
            (cutoff, below_cutoff)
        }
    }
}
