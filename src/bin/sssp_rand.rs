#[macro_use]
extern crate sssp_engine;
use sssp_engine::{datastr::graph::*, experiments, experiments::generators, report::*};
use std::error::Error;

use rand::prelude::*;

pub fn main() -> Result<(), Box<dyn Error>> {
    let _reporter = enable_reporting("sssp_rand");

    let seed = Default::default();
    report!("seed", seed);

    let core_ids = core_affinity::get_core_ids().unwrap();
    core_affinity::set_for_current(core_ids[0]);

    let mut rng = StdRng::from_seed(seed);
    let num_queries = experiments::num_sssp_queries();
    let mut max_error = 0.0f64;

    let mut instances_ctxt = push_collection_context("instances".to_string());

    let instances: Vec<(&str, OwnedGraph)> = vec![
        ("random_sparse", generators::random_sparse(10_000, 50_000, 1.0, 100.0, &mut rng)),
        ("grid", generators::grid(100, 100, 1.0, 10.0, &mut rng)),
        ("scale_free", generators::scale_free(5_000, 5, 3, 1.0, 100.0, &mut rng)),
    ];

    for (name, graph) in &instances {
        let _instance_ctxt = instances_ctxt.push_collection_item();
        report!("instance", name);
        report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs() });

        let mut algo_runs_ctxt = push_collection_context("algo_runs".to_string());
        let instance_error = experiments::run_random_queries(graph, &mut rng, &mut algo_runs_ctxt, num_queries);
        drop(algo_runs_ctxt);

        report!("max_abs_error", instance_error);
        max_error = max_error.max(instance_error);
    }

    drop(instances_ctxt);
    report!("max_abs_error", max_error);

    Ok(())
}
