//! `graph-to-dot`: render a graph file as Graphviz DOT.

use clap::Parser;
use kosa_core::dot::to_dot_string;
use tracing::info;

use crate::args::{CommonArgs, Settings, Source};
use crate::io::{emit, load_graph};

/// Arguments for `graph-to-dot`.
#[derive(Parser, Debug)]
#[command(
    name = "graph-to-dot",
    version,
    about = "Convert a graph file to Graphviz DOT",
    after_help = "EXAMPLES:\n    graph-to-dot -i routes.txt -o routes.dot\n    cat routes.txt | graph-to-dot --name routes | dot -Tsvg"
)]
pub struct DotArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Name of the emitted digraph; overrides the config file.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Execute `graph-to-dot`.
///
/// # Errors
///
/// Fails on unreadable or malformed input and on output failures.
pub fn run_dot(args: &DotArgs) -> anyhow::Result<()> {
    let settings = Settings::resolve(&args.common, None)?;
    let source = Source::from_arg(args.common.input.as_deref());
    let report = load_graph(&source, settings.representation)?;

    let name = args.name.as_deref().unwrap_or(&settings.graph_name);
    let body = to_dot_string(&report.graph, name);
    emit(args.common.output.as_deref(), &body)?;

    info!(edges = report.graph.edge_count(), "dot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::normalize_args;

    #[test]
    fn dot_args_parse_name() {
        let args = DotArgs::parse_from(normalize_args(["graph-to-dot", "-i", "g.txt", "-name", "routes"]));
        assert_eq!(args.name.as_deref(), Some("routes"));
        assert!(args.common.output.is_none());
    }

    #[test]
    fn dot_args_default_to_stdio() {
        let args = DotArgs::parse_from(["graph-to-dot"]);
        assert!(args.common.input.is_none());
        assert!(args.name.is_none());
    }
}
