#![no_main]

use kosa_core::graph::{Representation, Traversal};
use kosa_core::import::read_graph;
use kosa_core::scc::strongly_connected_components;
use libfuzzer_sys::fuzz_target;

// Keep the dense table small enough to allocate.
const MAX_VERTICES: usize = 4_096;

fuzz_target!(|data: &[u8]| {
    let Ok(report) = read_graph(data, Representation::Sparse) else {
        return;
    };
    if report.graph.size() > MAX_VERTICES {
        return;
    }

    let scc = strongly_connected_components(&report.graph, Traversal::Iterative)
        .expect("iterative traversal has no depth limit");
    let covered: usize = scc.components().iter().map(Vec::len).sum();
    assert_eq!(covered, report.graph.size());
});
