//! Graphviz DOT export.
//!
//! Edges are written in traversal order: vertices ascending, successors in
//! the backing's native order. Named graphs emit quoted, escaped names;
//! unnamed graphs emit bare handles. Isolated vertices are not listed.

use std::io::{self, Write};

use crate::graph::Graph;

/// Graph name used when none is configured.
pub const DEFAULT_GRAPH_NAME: &str = "G";

/// Write `graph` as `digraph <name> { ... }`.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_dot<W: Write + ?Sized>(out: &mut W, graph: &Graph, name: &str) -> io::Result<()> {
    for line in dot_lines(graph, name) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// [`write_dot`] into a `String`.
#[must_use]
pub fn to_dot_string(graph: &Graph, name: &str) -> String {
    dot_lines(graph, name).fold(String::new(), |mut out, line| {
        out.push_str(&line);
        out.push('\n');
        out
    })
}

/// Header, one line per edge, then the closing brace.
fn dot_lines(graph: &Graph, name: &str) -> impl Iterator<Item = String> {
    let header = format!("digraph {} {{", id(name));
    let edges = graph.edges().map(move |(u, v)| {
        if graph.has_names() {
            let from = graph.vertex_name(u).unwrap_or_default();
            let to = graph.vertex_name(v).unwrap_or_default();
            format!("  {} -> {};", quote(from), quote(to))
        } else {
            format!("  {u} -> {v};")
        }
    });

    std::iter::once(header)
        .chain(edges)
        .chain(std::iter::once("}".to_string()))
}

/// `"..."` with `"` and `\` backslash-escaped.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// The graph name as a DOT ID: bare when it is a plain identifier.
fn id(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain { name.to_string() } else { quote(name) }
}
