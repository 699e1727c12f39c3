//! Textbook Dijkstra over the indexed heap.
//!
//! Serves as the ground truth the recursive engine is validated against and
//! as the timing baseline in the benchmark binaries. The server variant keeps
//! its state around so repeated solves from different sources reuse the
//! allocations.

use super::*;
use crate::datastr::{index_heap::*, timestamped_vector::*};

pub struct Server<'a, G> {
    graph: &'a G,
    distances: TimestampedVector<Weight>,
    predecessors: Vec<InRangeOption<NodeId>>,
    queue: IndexdMinHeap<State<Weight>>,
}

impl<'a, G: for<'b> LinkIterGraph<'b>> Server<'a, G> {
    pub fn new(graph: &'a G) -> Server<'a, G> {
        let n = graph.num_nodes();

        Server {
            graph,
            distances: TimestampedVector::new(n, Weight::INFINITY),
            predecessors: vec![InRangeOption::new(None); n],
            queue: IndexdMinHeap::new(n),
        }
    }

    /// Settle the entire graph from `source` and return the result arrays.
    pub fn solve(&mut self, source: NodeId) -> ShortestPaths {
        self.distances.reset();
        self.queue.clear();
        self.distances[source as usize] = Weight::ZERO;
        self.queue.push(State {
            key: Weight::ZERO,
            node: source,
        });

        while let Some(State { node, key }) = self.queue.pop() {
            for link in self.graph.neighbor_iter(node) {
                let next_distance = key + link.weight;

                if next_distance < self.distances[link.node as usize] {
                    self.distances[link.node as usize] = next_distance;
                    self.predecessors[link.node as usize] = InRangeOption::new(Some(node));

                    let next = State {
                        key: next_distance,
                        node: link.node,
                    };
                    if self.queue.contains_index(next.as_index()) {
                        self.queue.decrease_key(next);
                    } else {
                        self.queue.push(next);
                    }
                }
            }
        }

        let n = self.graph.num_nodes();
        let mut distances = Vec::with_capacity(n);
        let mut predecessors = Vec::with_capacity(n);
        for node in 0..n {
            distances.push(self.distances[node]);
            // predecessors are not reset between solves, gate them on reachedness
            if self.distances[node].is_finite() && node != source as usize {
                predecessors.push(self.predecessors[node]);
            } else {
                predecessors.push(InRangeOption::new(None));
            }
        }

        ShortestPaths::new(distances, predecessors, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastr::graph::first_out_graph::OwnedGraph;

    fn w(weight: f64) -> Weight {
        Weight::new(weight)
    }

    #[test]
    fn simple_path() {
        let graph = OwnedGraph::from_adjacency_lists(vec![
            vec![Link { node: 1, weight: w(1.0) }],
            vec![Link { node: 2, weight: w(2.0) }],
            vec![Link { node: 3, weight: w(3.0) }],
            vec![],
        ]);

        let mut server = Server::new(&graph);
        let result = server.solve(0);
        assert_eq!(result.distances(), &[w(0.0), w(1.0), w(3.0), w(6.0)]);
        assert_eq!(result.path_to(3), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn unreached_stays_infinite() {
        let graph = OwnedGraph::from_adjacency_lists(vec![vec![Link { node: 1, weight: w(1.0) }], vec![], vec![], vec![]]);

        let mut server = Server::new(&graph);
        let result = server.solve(0);
        assert_eq!(result.distance(1), w(1.0));
        assert_eq!(result.distance(2), Weight::INFINITY);
        assert_eq!(result.predecessor(2), None);
        assert_eq!(result.path_to(2), None);
        assert_eq!(result.num_reached(), 2);
    }

    #[test]
    fn server_is_reusable() {
        let graph = OwnedGraph::from_adjacency_lists(vec![
            vec![Link { node: 1, weight: w(2.0) }],
            vec![Link { node: 0, weight: w(5.0) }],
        ]);

        let mut server = Server::new(&graph);
        let from_zero = server.solve(0);
        assert_eq!(from_zero.distance(1), w(2.0));
        let from_one = server.solve(1);
        assert_eq!(from_one.distance(0), w(5.0));
        assert_eq!(from_one.distance(1), w(0.0));
        assert_eq!(from_one.predecessor(1), None);
    }
}
