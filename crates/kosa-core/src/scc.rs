//! Strongly connected components via Kosaraju's two-pass depth-first search.
//!
//! # Algorithm
//!
//! 1. **Finish order.** Walk every vertex of `G` in ascending handle order as
//!    a potential DFS root. Each vertex gets the step at which its subtree
//!    exploration completed, so the result is a permutation of `[0, n)`.
//! 2. **Transpose.** Build `Gt` with [`Graph::reverse`].
//! 3. **Extraction.** Rank vertices by decreasing finish step
//!    (`rank[n - 1 - finish[x]] = x`) and walk `Gt` from each still unmarked
//!    vertex in rank order. Every vertex reached from one root forms exactly
//!    one component.
//!
//! Each pass is `O(|V| + |E|)` for the sparse backing (`O(|V|²)` for the dense
//! one, whose successor scan is a full row).
//!
//! # State
//!
//! Marking, finish steps and the step counter live in per-call context
//! values. Nothing is global, so independent runs never interfere.
//!
//! # Member order
//!
//! Members are listed in the order pass 2 discovered them, which depends on
//! the graph's successor order (see [`crate::graph`]). Compare components as
//! sets when the backing is not fixed.

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::traverse::{Control, DfsVisitor, depth_first, on_traversal_stack};
use crate::graph::{Graph, GraphError, Traversal, Vertex};

// ---------------------------------------------------------------------------
// Pass 1: finish order
// ---------------------------------------------------------------------------

/// Finish step of every vertex after pass 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishOrder {
    steps: Vec<usize>,
}

impl FinishOrder {
    /// Finish step of `v`.
    #[must_use]
    pub fn step(&self, v: Vertex) -> usize {
        self.steps[v]
    }

    /// Steps indexed by vertex; a permutation of `0..n`.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.steps
    }

    /// Vertices sorted by decreasing finish step: `rank[0]` finished last.
    #[must_use]
    pub fn ranking(&self) -> Vec<Vertex> {
        let n = self.steps.len();
        let mut rank = vec![0; n];
        for (x, &step) in self.steps.iter().enumerate() {
            rank[n - 1 - step] = x;
        }
        rank
    }
}

struct FinishContext {
    steps: Vec<usize>,
    step: usize,
}

impl DfsVisitor for FinishContext {
    fn discover(&mut self, _v: Vertex, _parent: Option<Vertex>) -> Control {
        Control::Continue
    }

    fn finish(&mut self, v: Vertex) {
        self.steps[v] = self.step;
        self.step += 1;
    }
}

/// Run pass 1 over `graph`.
///
/// # Errors
///
/// [`GraphError::RecursionLimit`] when a recursive traversal gets too deep,
/// [`GraphError::StackReservation`] if its stack cannot be reserved.
#[instrument(level = "debug", skip(graph), fields(size = graph.size()))]
pub fn finish_order(graph: &Graph, traversal: Traversal) -> Result<FinishOrder, GraphError> {
    on_traversal_stack(traversal, || finish_steps(graph, traversal))
}

fn finish_steps(graph: &Graph, traversal: Traversal) -> Result<FinishOrder, GraphError> {
    let n = graph.size();
    let mut marked = FixedBitSet::with_capacity(n);
    let mut ctx = FinishContext {
        steps: vec![0; n],
        step: 0,
    };

    // Every vertex is tried as a root. Anything already marked was finished
    // inside an earlier root's tree, so no vertex is left without a step.
    for x in 0..n {
        if !marked.contains(x) {
            depth_first(graph, x, &mut marked, traversal, &mut ctx)?;
        }
    }

    debug_assert_eq!(ctx.step, n, "finish order must be a permutation");
    debug!(steps = ctx.step, "pass 1 complete");
    Ok(FinishOrder { steps: ctx.steps })
}

// ---------------------------------------------------------------------------
// Pass 2: extraction
// ---------------------------------------------------------------------------

struct Collector {
    current: Vec<Vertex>,
}

impl DfsVisitor for Collector {
    fn discover(&mut self, v: Vertex, _parent: Option<Vertex>) -> Control {
        self.current.push(v);
        Control::Continue
    }
}

/// A partition of the vertex set into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccResult {
    count: usize,
    components: Vec<Vec<Vertex>>,
    #[serde(skip)]
    component_of: Vec<usize>,
    #[serde(skip)]
    cyclic: Vec<bool>,
}

impl SccResult {
    fn new(graph: &Graph, components: Vec<Vec<Vertex>>) -> Self {
        let mut component_of = vec![0; graph.size()];
        let mut cyclic = Vec::with_capacity(components.len());

        for (idx, members) in components.iter().enumerate() {
            for &v in members {
                component_of[v] = idx;
            }
            cyclic.push(members.len() > 1 || members.first().is_some_and(|&v| graph.has_edge(v, v)));
        }

        Self {
            count: components.len(),
            components,
            component_of,
            cyclic,
        }
    }

    /// Number of components.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Components in discovery order, members in discovery order.
    #[must_use]
    pub fn components(&self) -> &[Vec<Vertex>] {
        &self.components
    }

    /// Index of the component holding `v`.
    #[must_use]
    pub fn component_of(&self, v: Vertex) -> Option<usize> {
        self.component_of.get(v).copied()
    }

    /// `true` iff `a` and `b` are mutually reachable.
    #[must_use]
    pub fn same_component(&self, a: Vertex, b: Vertex) -> bool {
        matches!((self.component_of(a), self.component_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// `true` if component `idx` contains a cycle (more than one member, or
    /// a single member with a self-loop).
    #[must_use]
    pub fn is_cyclic(&self, idx: usize) -> bool {
        self.cyclic.get(idx).copied().unwrap_or(false)
    }

    /// Components with every member list sorted ascending, the list itself
    /// sorted by first member. Handy for comparing backings.
    #[must_use]
    pub fn normalized(&self) -> Vec<Vec<Vertex>> {
        let mut out: Vec<Vec<Vertex>> = self
            .components
            .iter()
            .map(|members| {
                let mut sorted = members.clone();
                sorted.sort_unstable();
                sorted
            })
            .collect();
        out.sort_unstable();
        out
    }

    #[must_use]
    pub fn into_components(self) -> Vec<Vec<Vertex>> {
        self.components
    }
}

/// Kosaraju engine with a fixed traversal strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kosaraju {
    traversal: Traversal,
}

impl Kosaraju {
    #[must_use]
    pub const fn new(traversal: Traversal) -> Self {
        Self { traversal }
    }

    #[must_use]
    pub const fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Decompose `graph` into strongly connected components.
    ///
    /// # Errors
    ///
    /// [`GraphError::RecursionLimit`], [`GraphError::Allocation`] or
    /// [`GraphError::StackReservation`] on inputs too large for the
    /// configured resources. The partition is never
    /// returned partially.
    #[instrument(level = "debug", skip(self, graph), fields(size = graph.size(), edges = graph.edge_count()))]
    pub fn run(&self, graph: &Graph) -> Result<SccResult, GraphError> {
        on_traversal_stack(self.traversal, || self.decompose(graph))
    }

    fn decompose(&self, graph: &Graph) -> Result<SccResult, GraphError> {
        let order = finish_steps(graph, self.traversal)?;
        let transpose = graph.reverse()?;
        let rank = order.ranking();

        let mut marked = FixedBitSet::with_capacity(transpose.size());
        let mut collector = Collector {
            current: Vec::new(),
        };
        let mut components = Vec::new();

        for &x in &rank {
            if marked.contains(x) {
                continue;
            }
            depth_first(&transpose, x, &mut marked, self.traversal, &mut collector)?;
            components.push(std::mem::take(&mut collector.current));
        }

        debug!(components = components.len(), "pass 2 complete");
        Ok(SccResult::new(graph, components))
    }
}

/// Decompose `graph` into strongly connected components.
///
/// # Errors
///
/// See [`Kosaraju::run`].
pub fn strongly_connected_components(
    graph: &Graph,
    traversal: Traversal,
) -> Result<SccResult, GraphError> {
    Kosaraju::new(traversal).run(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Representation;

    fn graph(n: usize, edges: &[(Vertex, Vertex)], repr: Representation) -> Graph {
        let mut g = Graph::new(n, false, repr).expect("graph");
        for &(u, v) in edges {
            g.add_edge(u, v).expect("edge");
        }
        g
    }

    const SCENARIO_A: [(Vertex, Vertex); 5] = [(0, 1), (0, 2), (2, 1), (2, 3), (3, 2)];

    #[test]
    fn finish_order_is_a_permutation() {
        let g = graph(4, &SCENARIO_A, Representation::Dense);
        let order = finish_order(&g, Traversal::recursive()).expect("pass 1");
        assert_eq!(order.as_slice(), &[3, 0, 2, 1]);
        assert_eq!(order.ranking(), vec![0, 2, 3, 1]);
    }

    #[test]
    fn finish_order_covers_unreachable_vertices() {
        // 2 and 3 are not reachable from 0.
        let g = graph(4, &[(0, 1), (3, 2)], Representation::Sparse);
        let order = finish_order(&g, Traversal::Iterative).expect("pass 1");
        let mut steps = order.as_slice().to_vec();
        steps.sort_unstable();
        assert_eq!(steps, vec![0, 1, 2, 3]);
    }

    #[test]
    fn scenario_a_dense_exact_order() {
        let g = graph(4, &SCENARIO_A, Representation::Dense);
        let scc = strongly_connected_components(&g, Traversal::recursive()).expect("scc");
        assert_eq!(scc.components(), &[vec![0], vec![2, 3], vec![1]]);
        assert_eq!(scc.count(), 3);
        assert!(scc.same_component(2, 3));
        assert!(!scc.same_component(0, 1));
        assert!(scc.is_cyclic(1));
        assert!(!scc.is_cyclic(0));
    }

    #[test]
    fn scenario_a_sparse_as_sets() {
        let g = graph(4, &SCENARIO_A, Representation::Sparse);
        let scc = strongly_connected_components(&g, Traversal::Iterative).expect("scc");
        assert_eq!(scc.normalized(), vec![vec![0], vec![1], vec![2, 3]]);
    }

    #[test]
    fn single_vertex_without_loop_is_acyclic_singleton() {
        let g = graph(1, &[], Representation::Dense);
        let scc = Kosaraju::default().run(&g).expect("scc");
        assert_eq!(scc.components(), &[vec![0]]);
        assert!(!scc.is_cyclic(0));
    }

    #[test]
    fn self_loop_marks_singleton_cyclic() {
        let g = graph(1, &[(0, 0)], Representation::Sparse);
        let scc = Kosaraju::default().run(&g).expect("scc");
        assert_eq!(scc.count(), 1);
        assert!(scc.is_cyclic(0));
    }

    #[test]
    fn component_of_out_of_range_is_none() {
        let g = graph(2, &[(0, 1)], Representation::Sparse);
        let scc = Kosaraju::default().run(&g).expect("scc");
        assert_eq!(scc.component_of(7), None);
        assert!(!scc.same_component(0, 7));
    }

    #[test]
    fn result_serializes_count_and_components() {
        let g = graph(2, &[(0, 1), (1, 0)], Representation::Dense);
        let scc = Kosaraju::default().run(&g).expect("scc");
        let json = serde_json::to_string(&scc).expect("json");
        assert_eq!(json, r#"{"count":1,"components":[[0,1]]}"#);
    }
}
