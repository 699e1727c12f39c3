//! A single-source shortest path engine for directed graphs with
//! non-negative real edge weights.
//!
//! The interesting part lives in [`algo::bmssp`]: a bounded multi-source
//! recursion over a partially-sorted block workspace which settles vertices
//! in batches of roughly equal distance instead of one heap pop at a time.
//! Graph representation, the reference Dijkstra, input parsing and the
//! generators are scaffolding around that module.

#[macro_use]
pub mod report;
pub mod algo;
pub mod cli;
pub mod datastr;
pub mod experiments;
pub mod import;
pub mod util;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
