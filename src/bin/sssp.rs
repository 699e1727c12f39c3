#[macro_use]
extern crate sssp_engine;
use sssp_engine::{algo::bmssp, cli::CliErr, datastr::graph::*, import::matrix_market, report::*};
use std::{env, error::Error, path::Path};

pub fn main() -> Result<(), Box<dyn Error>> {
    let _reporter = enable_reporting("sssp");

    let mut args = env::args();
    args.next();
    let arg = &args.next().ok_or(CliErr("No mtx file arg given"))?;
    let path = Path::new(arg);
    let source: NodeId = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(0);

    let (graph, info) = matrix_market::read_graph(path)?;
    report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs(), "symmetric": info.symmetric, "pattern": info.pattern });
    report!("source", source);

    let result = report_time("sssp engine", || bmssp::solve(&graph, source))?;

    report!("num_reached", result.num_reached());
    let furthest = result
        .distances()
        .iter()
        .filter(|dist| dist.is_finite())
        .max()
        .copied()
        .unwrap_or(Weight::ZERO);
    report!("max_distance", f64::from(furthest));

    Ok(())
}
