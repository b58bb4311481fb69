//! `scc-enumerate`: list the strongly connected components of a graph.

use clap::Parser;
use kosa_core::graph::Graph;
use kosa_core::scc::{SccResult, strongly_connected_components};
use tracing::info;

use crate::args::{CommonArgs, Settings, Source, TraversalArg};
use crate::io::{emit, load_graph};
use crate::output::OutputMode;

/// Arguments for `scc-enumerate`.
#[derive(Parser, Debug)]
#[command(
    name = "scc-enumerate",
    version,
    about = "Enumerate strongly connected components (Kosaraju)",
    after_help = "EXAMPLES:\n    scc-enumerate -i graph.txt\n    scc-enumerate -i graph.txt --repr dense --traversal recursive\n    scc-enumerate -i graph.txt --json"
)]
pub struct SccArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Depth-first strategy; overrides the config file.
    #[arg(long, value_enum)]
    pub traversal: Option<TraversalArg>,

    /// Emit JSON output instead of text.
    #[arg(long)]
    pub json: bool,
}

impl SccArgs {
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

/// Execute `scc-enumerate`.
///
/// Nothing is written unless the decomposition completed.
///
/// # Errors
///
/// Fails on unreadable input, resource exhaustion and output failures.
pub fn run_scc(args: &SccArgs) -> anyhow::Result<()> {
    let settings = Settings::resolve(&args.common, args.traversal)?;
    let source = Source::from_arg(args.common.input.as_deref());
    let report = load_graph(&source, settings.representation)?;

    let result = strongly_connected_components(&report.graph, settings.traversal)?;
    info!(components = result.count(), "components found");

    let body = if args.output_mode().is_json() {
        let mut json = serde_json::to_string(&result)?;
        json.push('\n');
        json
    } else {
        render_text(&report.graph, &result)
    };
    emit(args.common.output.as_deref(), &body)
}

/// One line of labels per component, each followed by a blank line, then
/// the count.
fn render_text(graph: &Graph, result: &SccResult) -> String {
    let mut out = String::new();
    for members in result.components() {
        let labels: Vec<String> = members.iter().map(|&v| graph.label(v)).collect();
        out.push_str(&labels.join(" "));
        out.push_str("\n\n");
    }
    out + &format!("{} strongly connected components\n", result.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kosa_core::graph::{Representation, Traversal};
    use kosa_core::import::parse_graph;

    fn decompose(text: &str, repr: Representation) -> (Graph, SccResult) {
        let graph = parse_graph(text, repr).expect("import").graph;
        let result = strongly_connected_components(&graph, Traversal::Iterative).expect("scc");
        (graph, result)
    }

    #[test]
    fn text_lists_components_then_count() {
        let (g, r) = decompose("4\n0 1\n0 2\n2 1\n2 3\n3 2\n", Representation::Dense);
        assert_eq!(
            render_text(&g, &r),
            "0\n\n2 3\n\n1\n\n3 strongly connected components\n"
        );
    }

    #[test]
    fn text_uses_names_when_present() {
        let (g, r) = decompose("2 n\nping\npong\nping pong\npong ping\n", Representation::Dense);
        assert_eq!(
            render_text(&g, &r),
            "ping pong\n\n1 strongly connected components\n"
        );
    }

    #[test]
    fn scc_args_parse() {
        let args = SccArgs::parse_from(crate::args::normalize_args([
            "scc-enumerate",
            "-traversal",
            "recursive",
            "--json",
        ]));
        assert_eq!(args.traversal, Some(TraversalArg::Recursive));
        assert!(args.output_mode().is_json());
    }
}
