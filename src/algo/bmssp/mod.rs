//! Single-source shortest paths below the sorting barrier.
//!
//! Instead of settling one globally-minimal vertex per heap operation the way
//! Dijkstra does, the solver recursively partitions the shortest path tree
//! into distance bands. At every level a bounded relaxation picks out the few
//! frontier vertices carrying large subtrees (pivots), a block workspace
//! hands out batches of roughly-smallest frontier vertices, and each batch is
//! settled by a recursive call one level down under a tighter distance bound.
//! Level 0 finishes frontiers off with a size-capped Dijkstra. The interplay
//! of batch size, recursion width and relaxation depth is what brings the
//! total work below `m + n log n`.
//!
//! Follows Duan, Mao, Mao, Shu and Yin, "Breaking the Sorting Barrier for
//! Directed Single-Source Shortest Paths" (2025).

use super::*;
use crate::datastr::{block_queue::BlockQueue, index_heap::IndexdMinHeap};
use std::collections::HashSet;

mod base;
mod pivots;

/// The solve-wide constants derived from the node count.
#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    // relaxation depth of the pivot search, subtree size threshold,
    // and settle cap of the level-0 Dijkstra: (log2 n)^(1/3)
    k: usize,
    // each recursion level widens the settle allowance by 2^t: (log2 n)^(2/3)
    t: u32,
    // recursion entry level: (log2 n) / t
    top_level: u32,
    num_nodes: usize,
}

impl Parameters {
    pub fn new(num_nodes: usize) -> Parameters {
        if num_nodes <= 1 {
            return Parameters {
                k: 1,
                t: 1,
                top_level: 1,
                num_nodes,
            };
        }

        let log_n = (num_nodes as f64).log2();
        let k = (log_n.powf(1.0 / 3.0).floor() as usize).max(2);
        let t = (log_n.powf(2.0 / 3.0).floor() as u32).max(2);
        let top_level = ((log_n / f64::from(t)).ceil() as u32).max(1);

        Parameters { k, t, top_level, num_nodes }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn top_level(&self) -> u32 {
        self.top_level
    }

    /// Workspace block size at `level`: 2^((level-1) * t), clamped to the node count.
    fn block_size(&self, level: u32) -> usize {
        Self::clamped_shift(1, (level - 1) * self.t, self.num_nodes)
    }

    /// How many vertices an activation at `level` may settle: k * 2^(level * t),
    /// clamped to the node count.
    fn frontier_capacity(&self, level: u32) -> usize {
        Self::clamped_shift(self.k, level * self.t, self.num_nodes)
    }

    fn clamped_shift(factor: usize, exponent: u32, max: usize) -> usize {
        // the exponent stays below log2 n + t, but keep the shift safe anyway
        let shifted = (factor as u128) << exponent.min(100);
        shifted.min(max.max(1) as u128).max(1) as usize
    }
}

/// One solve worth of shared state: the tentative distances, the predecessor
/// of the arc that last wrote each distance, and the advisory completeness
/// flags. Borrowed mutably by every recursion level in turn.
pub struct Solver<'a, G> {
    graph: &'a G,
    params: Parameters,
    distances: Vec<Weight>,
    predecessors: Vec<InRangeOption<NodeId>>,
    complete: Vec<bool>,
    // reused by every level-0 call, cleared on entry
    base_queue: IndexdMinHeap<State<Weight>>,
}

/// Compute shortest distances and predecessors from `source` to every
/// reachable vertex. The only failure modes are precondition violations;
/// the solve itself is total.
pub fn solve<G: for<'b> LinkIterGraph<'b>>(graph: &G, source: NodeId) -> Result<ShortestPaths, InvalidInput> {
    let n = graph.num_nodes();
    if (source as usize) >= n {
        return Err(InvalidInput::SourceOutOfRange { source, num_nodes: n });
    }
    for node in 0..n as NodeId {
        for link in graph.neighbor_iter(node) {
            if !(link.weight >= Weight::ZERO) {
                return Err(InvalidInput::NegativeWeight {
                    tail: node,
                    head: link.node,
                    weight: link.weight,
                });
            }
        }
    }

    Ok(Solver::new(graph).run(source))
}

impl<'a, G: for<'b> LinkIterGraph<'b>> Solver<'a, G> {
    pub fn new(graph: &'a G) -> Solver<'a, G> {
        let n = graph.num_nodes();

        Solver {
            graph,
            params: Parameters::new(n),
            distances: vec![Weight::INFINITY; n],
            predecessors: vec![InRangeOption::new(None); n],
            complete: vec![false; n],
            base_queue: IndexdMinHeap::new(n),
        }
    }

    /// Run the full recursion from `source` and hand out the result arrays.
    pub fn run(mut self, source: NodeId) -> ShortestPaths {
        self.distances[source as usize] = Weight::ZERO;
        self.complete[source as usize] = true;

        // seed the frontier by relaxing the source arcs once
        for link in self.graph.neighbor_iter(source) {
            if link.weight < self.distances[link.node as usize] {
                self.distances[link.node as usize] = link.weight;
                self.predecessors[link.node as usize] = InRangeOption::new(Some(source));
            }
        }

        self.bmssp(self.params.top_level, Weight::INFINITY, vec![source]);

        // predecessors are only ever written by strict improvements, so the
        // source and unreached vertices still carry none
        ShortestPaths::new(self.distances, self.predecessors, source)
    }

    /// Bounded multi-source shortest paths: settle every vertex whose
    /// distance through `frontier` is below some improved bound, and report
    /// that bound together with the settled vertices.
    fn bmssp(&mut self, level: u32, bound: Weight, frontier: Vec<NodeId>) -> (Weight, Vec<NodeId>) {
        if level == 0 {
            return self.base_case(bound, frontier);
        }

        let (pivots, reach) = self.find_pivots(bound, &frontier);
        if pivots.is_empty() {
            return (bound, reach);
        }

        let capacity = self.params.frontier_capacity(level);
        let mut queue = BlockQueue::new(self.params.block_size(level), bound, capacity);
        for &pivot in &pivots {
            if self.distances[pivot as usize] < bound {
                queue.insert(pivot, self.distances[pivot as usize]);
            }
        }

        // the running improved bound starts at the smallest distance of any
        // already-complete pivot and is replaced by every child call's result
        let mut improved_bound = Weight::INFINITY;
        for &pivot in &pivots {
            if self.complete[pivot as usize] {
                improved_bound = improved_bound.min(self.distances[pivot as usize]);
            }
        }
        if improved_bound == Weight::INFINITY {
            improved_bound = self.distances[pivots[0] as usize];
        }

        let mut settled: Vec<NodeId> = Vec::new();
        let mut settled_members: HashSet<NodeId> = HashSet::with_capacity(capacity);

        while settled_members.len() < capacity && !queue.is_empty() {
            let (batch, batch_bound) = queue.pull();
            if batch.is_empty() {
                break;
            }

            let (child_bound, child_settled) = self.bmssp(level - 1, batch_bound, batch.clone());
            improved_bound = child_bound;

            // relax out of everything the child settled and route each
            // improvement by its new distance band
            let mut prepend: Vec<(NodeId, Weight)> = Vec::new();
            for &settled_node in &child_settled {
                for link in self.graph.neighbor_iter(settled_node) {
                    if let Some(candidate) = self.try_relax(settled_node, link) {
                        if candidate >= batch_bound && candidate < bound {
                            queue.insert(link.node, candidate);
                        } else if candidate >= child_bound && candidate < batch_bound {
                            prepend.push((link.node, candidate));
                        }
                        // below child_bound the vertex is settled or about to be
                    }
                }
            }
            for &settled_node in &child_settled {
                if settled_members.insert(settled_node) {
                    settled.push(settled_node);
                }
            }

            // batch vertices the child did not finish go back in front
            for &node in &batch {
                let dist = self.distances[node as usize];
                if dist >= child_bound && dist < batch_bound {
                    prepend.push((node, dist));
                }
            }
            queue.batch_prepend(prepend);
        }

        let final_bound = improved_bound.min(bound);
        for &node in &reach {
            if self.distances[node as usize] < final_bound && settled_members.insert(node) {
                settled.push(node);
            }
        }

        (final_bound, settled)
    }

    /// Relax the arc `tail -> link.node`. Ties still count as relaxed so the
    /// head keeps flowing through the workspace, but only a strict improvement
    /// may rewrite the predecessor: every predecessor write strictly lowers
    /// the head's distance, which keeps the predecessor array a forest even
    /// across zero-weight cycles. Returns the head's distance on success.
    #[inline]
    fn try_relax(&mut self, tail: NodeId, link: Link) -> Option<Weight> {
        // self loops never shorten anything
        if link.node == tail {
            return None;
        }
        let candidate = self.distances[tail as usize] + link.weight;
        if candidate <= self.distances[link.node as usize] {
            if candidate < self.distances[link.node as usize] {
                self.distances[link.node as usize] = candidate;
                self.predecessors[link.node as usize] = InRangeOption::new(Some(tail));
            }
            Some(candidate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::dijkstra;
    use crate::datastr::graph::first_out_graph::OwnedGraph;
    use crate::experiments::generators;
    use rand::prelude::*;

    fn w(weight: f64) -> Weight {
        Weight::new(weight)
    }

    fn graph_from_arcs(n: usize, arcs: &[(NodeId, NodeId, f64)]) -> OwnedGraph {
        let mut adjacency = vec![Vec::new(); n];
        for &(tail, head, weight) in arcs {
            adjacency[tail as usize].push(Link {
                node: head,
                weight: w(weight),
            });
        }
        OwnedGraph::from_adjacency_lists(adjacency)
    }

    #[test]
    fn parameters_for_trivial_graphs() {
        let params = Parameters::new(1);
        assert_eq!(params.k(), 1);
        assert_eq!(params.top_level(), 1);

        let params = Parameters::new(1_000_000);
        assert!(params.k() >= 2);
        assert!(params.top_level() >= 1);
        // block size and capacity never exceed the node count and never vanish
        for level in 1..=params.top_level() {
            assert!(params.block_size(level) >= 1);
            assert!(params.frontier_capacity(level) <= 1_000_000);
        }
    }

    #[test]
    fn path_graph() {
        let graph = graph_from_arcs(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0)]);
        let result = solve(&graph, 0).unwrap();

        assert_eq!(result.distances(), &[w(0.0), w(1.0), w(3.0), w(6.0)]);
        assert_eq!(result.predecessor(0), None);
        assert_eq!(result.predecessor(1), Some(0));
        assert_eq!(result.predecessor(2), Some(1));
        assert_eq!(result.predecessor(3), Some(2));
    }

    #[test]
    fn diamond_takes_the_cheap_side() {
        let graph = graph_from_arcs(4, &[(0, 1, 1.0), (0, 2, 3.0), (1, 3, 4.0), (2, 3, 1.0)]);
        let result = solve(&graph, 0).unwrap();

        assert_eq!(result.distances(), &[w(0.0), w(1.0), w(3.0), w(4.0)]);
        assert_eq!(result.predecessor(3), Some(2));
    }

    #[test]
    fn disconnected_vertices_stay_infinite() {
        let graph = graph_from_arcs(4, &[(0, 1, 1.0)]);
        let result = solve(&graph, 0).unwrap();

        assert_eq!(result.distance(0), w(0.0));
        assert_eq!(result.distance(1), w(1.0));
        assert_eq!(result.distance(2), Weight::INFINITY);
        assert_eq!(result.distance(3), Weight::INFINITY);
        assert_eq!(result.predecessor(2), None);
        assert_eq!(result.predecessor(3), None);
    }

    #[test]
    fn star_graph() {
        let arcs: Vec<_> = (1..10).map(|node| (0, node as NodeId, node as f64)).collect();
        let graph = graph_from_arcs(10, &arcs);
        let result = solve(&graph, 0).unwrap();

        for node in 1..10 {
            assert_eq!(result.distance(node), w(node as f64));
            assert_eq!(result.predecessor(node), Some(0));
        }
    }

    #[test]
    fn singleton_graph() {
        let graph = graph_from_arcs(1, &[]);
        let result = solve(&graph, 0).unwrap();
        assert_eq!(result.distances(), &[w(0.0)]);
        assert_eq!(result.predecessor(0), None);
    }

    #[test]
    fn unit_grid_distances_are_manhattan() {
        // 5x5 4-connected grid with unit weights, source in the corner
        let mut arcs = Vec::new();
        let idx = |row: NodeId, col: NodeId| row * 5 + col;
        for row in 0..5 {
            for col in 0..5 {
                if col + 1 < 5 {
                    arcs.push((idx(row, col), idx(row, col + 1), 1.0));
                    arcs.push((idx(row, col + 1), idx(row, col), 1.0));
                }
                if row + 1 < 5 {
                    arcs.push((idx(row, col), idx(row + 1, col), 1.0));
                    arcs.push((idx(row + 1, col), idx(row, col), 1.0));
                }
            }
        }
        let graph = graph_from_arcs(25, &arcs);
        let result = solve(&graph, 0).unwrap();

        for row in 0..5u32 {
            for col in 0..5u32 {
                assert_eq!(result.distance(idx(row, col)), w((row + col) as f64));
            }
        }
        assert_eq!(result.distance(24), w(8.0));
    }

    #[test]
    fn rejects_invalid_input() {
        let graph = graph_from_arcs(2, &[(0, 1, 1.0)]);
        assert_eq!(
            solve(&graph, 2).unwrap_err(),
            InvalidInput::SourceOutOfRange { source: 2, num_nodes: 2 }
        );

        let negative = graph_from_arcs(2, &[(0, 1, -1.0)]);
        assert_eq!(
            solve(&negative, 0).unwrap_err(),
            InvalidInput::NegativeWeight {
                tail: 0,
                head: 1,
                weight: w(-1.0)
            }
        );
    }

    #[test]
    fn predecessors_certify_distances() {
        let mut rng = StdRng::from_seed([42; 32]);
        let graph = generators::random_sparse(200, 800, 1.0, 100.0, &mut rng);
        let result = solve(&graph, 0).unwrap();

        for node in 0..200 {
            if let Some(pred) = result.predecessor(node) {
                let link = graph
                    .neighbor_iter(pred)
                    .find(|link| link.node == node && (result.distance(pred) + link.weight).fuzzy_eq(result.distance(node)));
                assert!(link.is_some(), "predecessor of {} does not certify its distance", node);
            } else {
                assert!(node == 0 || !result.distance(node).is_finite());
            }
        }

        // distances strictly decrease towards the source along any reported path
        let path = result.path_to(199).unwrap();
        for pair in path.windows(2) {
            assert!(result.distance(pair[0]) < result.distance(pair[1]));
        }
    }

    #[test]
    fn zero_weight_cycles_cannot_trap_the_predecessor_walk() {
        // 1 and 2 tie at distance 1 through a zero-weight two-cycle; relaxing
        // it in either order must not leave predecessors pointing at each other
        let graph = graph_from_arcs(3, &[(0, 1, 1.0), (1, 2, 0.0), (2, 1, 0.0)]);
        let result = solve(&graph, 0).unwrap();

        assert_eq!(result.distance(1), w(1.0));
        assert_eq!(result.distance(2), w(1.0));

        for node in 0..3 {
            let path = result.path_to(node).unwrap();
            assert_eq!(path[0], 0);
            assert_eq!(*path.last().unwrap(), node);
            assert!(path.len() <= 3, "predecessor walk of {} revisits a vertex", node);
            // distances never increase towards the source, ties only across
            // zero-weight hops
            for pair in path.windows(2) {
                assert!(result.distance(pair[0]) <= result.distance(pair[1]));
                if result.distance(pair[0]) == result.distance(pair[1]) {
                    let zero_arc = graph
                        .neighbor_iter(pair[0])
                        .any(|link| link.node == pair[1] && link.weight == Weight::ZERO);
                    assert!(zero_arc);
                }
            }
        }
    }

    #[test]
    fn tied_paths_keep_predecessor_walks_strictly_decreasing() {
        // both sides of the diamond reach 3 at distance 2, whichever
        // predecessor is kept must still walk back to the source
        let graph = graph_from_arcs(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let result = solve(&graph, 0).unwrap();

        assert_eq!(result.distance(3), w(2.0));
        let path = result.path_to(3).unwrap();
        assert_eq!(path[0], 0);
        assert_eq!(path.len(), 3);
        for pair in path.windows(2) {
            assert!(result.distance(pair[0]) < result.distance(pair[1]));
        }
    }

    #[test]
    fn agrees_with_dijkstra_on_random_sparse_graphs() {
        for seed in 0..8u8 {
            let mut rng = StdRng::from_seed([seed; 32]);
            let graph = generators::random_sparse(300, 1500, 1.0, 100.0, &mut rng);
            let source = rng.gen_range(0..300);

            let result = solve(&graph, source).unwrap();
            let reference = dijkstra::Server::new(&graph).solve(source);

            for node in 0..300 {
                assert!(
                    result.distance(node).fuzzy_eq(reference.distance(node)),
                    "seed {}: distance of {} diverges: {} vs {}",
                    seed,
                    node,
                    result.distance(node),
                    reference.distance(node)
                );
            }
        }
    }

    #[test]
    fn agrees_with_dijkstra_on_other_graph_families() {
        let mut rng = StdRng::from_seed([7; 32]);
        let grid = generators::grid(12, 17, 1.0, 10.0, &mut rng);
        let scale_free = generators::scale_free(150, 4, 3, 1.0, 100.0, &mut rng);
        let dense = generators::complete(40, 1.0, 100.0, &mut rng);

        for graph in [&grid, &scale_free, &dense].iter() {
            let result = solve(*graph, 0).unwrap();
            let reference = dijkstra::Server::new(*graph).solve(0);
            for node in 0..graph.num_nodes() as NodeId {
                assert!(result.distance(node).fuzzy_eq(reference.distance(node)));
            }
        }
    }

    #[test]
    fn handles_duplicate_and_self_loop_arcs() {
        let graph = graph_from_arcs(3, &[(0, 1, 5.0), (0, 1, 2.0), (1, 1, 0.0), (1, 2, 1.0), (1, 2, 1.0)]);
        let result = solve(&graph, 0).unwrap();
        assert_eq!(result.distance(1), w(2.0));
        assert_eq!(result.distance(2), w(3.0));
        assert_eq!(result.path_to(2), Some(vec![0, 1, 2]));
    }
}
