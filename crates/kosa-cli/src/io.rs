//! Graph input and result output for the tools.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use kosa_core::graph::Representation;
use kosa_core::import::{ImportReport, read_graph};
use tracing::info;

use crate::args::Source;

/// Read and import the graph from `source`.
///
/// # Errors
///
/// Fails when the source cannot be opened or the text is structurally
/// invalid. Skipped edge lines are not errors.
pub fn load_graph(source: &Source, representation: Representation) -> anyhow::Result<ImportReport> {
    let report = match source {
        Source::Stdin => read_graph(io::stdin().lock(), representation)
            .context("failed to import graph from standard input")?,
        Source::File(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            read_graph(BufReader::new(file), representation)
                .with_context(|| format!("failed to import {}", path.display()))?
        }
    };

    info!(
        vertices = report.graph.size(),
        edges = report.graph.edge_count(),
        skipped = report.skipped.len(),
        format = %report.format,
        %representation,
        "graph loaded"
    );
    Ok(report)
}

/// Open the result destination. `None` and `-` mean stdout.
///
/// # Errors
///
/// Fails when the output file cannot be created.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Write `body` to the destination in one go and flush it.
///
/// # Errors
///
/// Fails when the destination cannot be opened or written.
pub fn emit(path: Option<&Path>, body: &str) -> anyhow::Result<()> {
    let mut out = open_output(path)?;
    out.write_all(body.as_bytes()).context("failed to write output")?;
    out.flush().context("failed to flush output")
}
