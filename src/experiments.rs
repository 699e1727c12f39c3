//! Helpers to run reproducible solver experiments.

use crate::{
    algo::{bmssp, dijkstra, ShortestPaths},
    datastr::graph::*,
    report::*,
};
use rand::prelude::*;

pub mod generators;

/// Number of queries performed per experiment instance.
/// Can be overridden through the NUM_SSSP_QUERIES env var.
pub fn num_sssp_queries() -> usize {
    std::env::var("NUM_SSSP_QUERIES").map_or(100, |num| num.parse().unwrap())
}

/// Solve from random sources with both the engine and the reference Dijkstra,
/// reporting timings and distance agreement per query.
/// Returns the largest absolute distance error observed.
pub fn run_random_queries<G: for<'b> LinkIterGraph<'b>>(
    graph: &G,
    rng: &mut StdRng,
    reporting_context: &mut CollectionContextGuard,
    num_queries: usize,
) -> f64 {
    let mut reference = dijkstra::Server::new(graph);
    let mut max_error = 0.0f64;

    for _ in 0..num_queries {
        let _query_ctxt = reporting_context.push_collection_item();
        let source = rng.gen_range(0..graph.num_nodes() as NodeId);
        report!("source", source);

        let (result, time) = measure(|| bmssp::solve(graph, source).expect("generated graphs are valid input"));
        report!("running_time_ms", time.as_secs_f64() * 1000.0);

        let (truth, dijkstra_time) = measure(|| reference.solve(source));
        report!("dijkstra_running_time_ms", dijkstra_time.as_secs_f64() * 1000.0);

        let error = max_distance_error(&result, &truth);
        report!("max_abs_error", error);
        report!("num_reached", result.num_reached());
        max_error = max_error.max(error);
    }

    max_error
}

/// Largest absolute difference between two distance arrays.
/// Disagreement on reachability counts as infinite error.
pub fn max_distance_error(result: &ShortestPaths, truth: &ShortestPaths) -> f64 {
    result
        .distances()
        .iter()
        .zip(truth.distances().iter())
        .map(|(&a, &b)| match (a.is_finite(), b.is_finite()) {
            (true, true) => f64::from((a - b).abs()),
            (false, false) => 0.0,
            _ => f64::INFINITY,
        })
        .fold(0.0, f64::max)
}
