//! Single-pair reachability with a path witness.
//!
//! A depth-first search from `start` over the same successor cursors the SCC
//! engine uses. The first time `goal` is discovered the search stops and the
//! predecessor chain is unwound into a [`Path`]. The witness is the first
//! path found in traversal order, not necessarily the shortest.

use std::fmt;

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::traverse::{Control, DfsVisitor, depth_first, on_traversal_stack};
use crate::graph::{Graph, GraphError, Traversal, Vertex};

/// A walk `start -> ... -> goal` along existing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    vertices: Vec<Vertex>,
}

impl Path {
    /// Vertices from start to goal inclusive.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of edges walked.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Render as `v1 -> v2 -> ... -> vk` using the graph's vertex labels.
    #[must_use]
    pub fn render(&self, graph: &Graph) -> String {
        self.vertices
            .iter()
            .map(|&v| graph.label(v))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

struct PathSearch {
    goal: Vertex,
    parent: Vec<Option<Vertex>>,
    found: bool,
}

impl DfsVisitor for PathSearch {
    fn discover(&mut self, v: Vertex, parent: Option<Vertex>) -> Control {
        self.parent[v] = parent;
        if v == self.goal {
            self.found = true;
            Control::Stop
        } else {
            Control::Continue
        }
    }
}

/// Find a path from `start` to `goal`, or `Ok(None)` if `goal` is unreachable.
///
/// `start == goal` yields the one-vertex path without needing a self-loop.
///
/// # Errors
///
/// [`GraphError::VertexOutOfRange`] for a bad handle,
/// [`GraphError::RecursionLimit`] if a recursive traversal gets too deep.
#[instrument(level = "debug", skip(graph), fields(size = graph.size()))]
pub fn find_path(
    graph: &Graph,
    start: Vertex,
    goal: Vertex,
    traversal: Traversal,
) -> Result<Option<Path>, GraphError> {
    for v in [start, goal] {
        if v >= graph.size() {
            return Err(GraphError::VertexOutOfRange {
                vertex: v,
                size: graph.size(),
            });
        }
    }

    let mut marked = FixedBitSet::with_capacity(graph.size());
    let mut search = PathSearch {
        goal,
        parent: vec![None; graph.size()],
        found: false,
    };
    on_traversal_stack(traversal, || {
        depth_first(graph, start, &mut marked, traversal, &mut search)
    })?;

    if !search.found {
        debug!(visited = marked.count_ones(..), "goal not reachable");
        return Ok(None);
    }

    let mut vertices = vec![goal];
    let mut cursor = goal;
    while let Some(prev) = search.parent[cursor] {
        vertices.push(prev);
        cursor = prev;
    }
    vertices.reverse();

    debug!(hops = vertices.len() - 1, "path found");
    Ok(Some(Path { vertices }))
}
