//! `path-find`: find a path between two vertices.

use std::io::{self, BufRead};

use anyhow::Context;
use clap::Parser;
use kosa_core::graph::{Graph, Vertex};
use kosa_core::reach::find_path;
use tracing::{debug, info};

use crate::args::{ArgError, CommonArgs, Settings, Source, TraversalArg};
use crate::io::{emit, load_graph};

/// Arguments for `path-find`.
#[derive(Parser, Debug)]
#[command(
    name = "path-find",
    version,
    about = "Find a path from one vertex to another",
    after_help = "Vertices are given by name (named graphs) or by handle.\n\nEXAMPLES:\n    path-find -i routes.txt -start paris -goal nice\n    echo \"0 3\" | path-find -i graph.txt"
)]
pub struct PathArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Depth-first strategy; overrides the config file.
    #[arg(long, value_enum)]
    pub traversal: Option<TraversalArg>,

    /// Start vertex. Read from standard input when omitted.
    #[arg(long, value_name = "VERTEX")]
    pub start: Option<String>,

    /// Goal vertex. Read from standard input when omitted.
    #[arg(long, value_name = "VERTEX")]
    pub goal: Option<String>,
}

/// Execute `path-find`.
///
/// A missing route is a normal outcome and is reported on the output.
///
/// # Errors
///
/// Fails on unreadable input, an unresolvable vertex, missing endpoints,
/// resource exhaustion and output failures.
pub fn run_path(args: &PathArgs) -> anyhow::Result<()> {
    let settings = Settings::resolve(&args.common, args.traversal)?;
    let source = Source::from_arg(args.common.input.as_deref());
    let report = load_graph(&source, settings.representation)?;
    let graph = &report.graph;

    let (start_ref, goal_ref) = match (&args.start, &args.goal) {
        (Some(start), Some(goal)) => (start.clone(), goal.clone()),
        _ if source.is_stdin() => return Err(ArgError::EndpointsFromStdin.into()),
        _ => fill_endpoints(args.start.clone(), args.goal.clone(), io::stdin().lock())?,
    };

    let start = resolve_vertex(graph, &start_ref)?;
    let goal = resolve_vertex(graph, &goal_ref)?;
    debug!(start, goal, "endpoints resolved");

    let line = match find_path(graph, start, goal, settings.traversal)? {
        Some(path) => {
            info!(hops = path.hops(), "path found");
            path.render(graph)
        }
        None => {
            info!("no path");
            format!(
                "no path found from {} to {}",
                graph.label(start),
                graph.label(goal)
            )
        }
    };
    emit(args.common.output.as_deref(), &format!("{line}\n"))
}

/// Resolve a vertex reference: a vertex name first, then an in-range handle.
///
/// # Errors
///
/// [`ArgError::UnknownVertex`] when neither applies.
pub fn resolve_vertex(graph: &Graph, reference: &str) -> Result<Vertex, ArgError> {
    if let Some(v) = graph.vertex_from_name(reference) {
        return Ok(v);
    }
    reference
        .parse::<Vertex>()
        .ok()
        .filter(|&v| v < graph.size())
        .ok_or_else(|| ArgError::UnknownVertex {
            reference: reference.to_string(),
            size: graph.size(),
        })
}

/// Fill whichever endpoints are missing from whitespace-separated tokens
/// on `reader`, start first.
fn fill_endpoints<R: BufRead>(
    start: Option<String>,
    goal: Option<String>,
    reader: R,
) -> anyhow::Result<(String, String)> {
    let wanted = usize::from(start.is_none()) + usize::from(goal.is_none());
    let mut tokens = read_tokens(reader, wanted)
        .context("failed to read endpoints from standard input")?
        .into_iter();

    let start = start
        .or_else(|| tokens.next())
        .ok_or(ArgError::MissingEndpoint("start"))?;
    let goal = goal
        .or_else(|| tokens.next())
        .ok_or(ArgError::MissingEndpoint("goal"))?;
    Ok((start, goal))
}

/// Up to `wanted` tokens, reading only as many lines as needed.
fn read_tokens<R: BufRead>(reader: R, wanted: usize) -> io::Result<Vec<String>> {
    let mut tokens = Vec::with_capacity(wanted);
    if wanted == 0 {
        return Ok(tokens);
    }
    for line in reader.lines() {
        tokens.extend(line?.split_whitespace().map(str::to_string));
        if tokens.len() >= wanted {
            tokens.truncate(wanted);
            break;
        }
    }
    Ok(tokens)
}
