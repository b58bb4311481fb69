#![no_main]

use kosa_core::graph::Representation;
use kosa_core::import::read_graph;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for repr in [Representation::Dense, Representation::Sparse] {
        if let Ok(report) = read_graph(data, repr) {
            let g = &report.graph;
            assert!(g.size() > 0);
            assert!(g.edges().all(|(u, v)| u < g.size() && v < g.size()));
        }
    }
});
