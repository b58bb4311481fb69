//! Representation-agnostic successor enumeration and the depth-first driver
//! used by the SCC and reachability engines.
//!
//! # Successor cursors
//!
//! [`Successors`] is a cheap, cloneable cursor over one vertex's successor
//! set. Restarting enumeration is just asking the graph for a new cursor.
//! The iterative traversal keeps one cursor per stack frame, so a frame
//! resumes exactly where the recursive version would after its child call
//! returns.
//!
//! # Strategies
//!
//! [`Traversal::Recursive`] is the reference implementation. It is guarded
//! by a depth limit so a pathologically deep graph is reported as
//! [`GraphError::RecursionLimit`] instead of overflowing the thread stack.
//! [`Traversal::Iterative`] walks an explicit stack and has no depth limit.
//! Both discover and finish vertices in exactly the same order.
//!
//! The depth limit only bounds stack use if the stack is big enough for it.
//! Engines therefore run recursive searches through [`on_traversal_stack`],
//! which moves the work onto a scoped thread whose stack is sized from the
//! limit. Limits above [`MAX_RECURSION_DEPTH`] are clamped.

use std::iter::{FusedIterator, Rev};
use std::panic;
use std::slice;
use std::thread;

use fixedbitset::FixedBitSet;

use super::{Graph, GraphError, Vertex};

/// Default depth limit for [`Traversal::Recursive`].
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Largest depth limit honoured; bigger limits are clamped to this.
pub const MAX_RECURSION_DEPTH: usize = 1 << 19;

/// Stack reserved per nested visit, with headroom for unoptimised builds.
const FRAME_BYTES: usize = 2 * 1024;

/// Stack reserved on top of the frames for the visitor and the runtime.
const BASE_STACK_BYTES: usize = 256 * 1024;

// ---------------------------------------------------------------------------
// Successors
// ---------------------------------------------------------------------------

/// Iterator over the distinct successors of one vertex.
///
/// Dense graphs yield successors in ascending handle order; sparse graphs
/// yield the most recently inserted successor first.
#[derive(Debug, Clone)]
pub struct Successors<'g> {
    inner: Cursor<'g>,
}

#[derive(Debug, Clone)]
enum Cursor<'g> {
    Dense {
        table: &'g FixedBitSet,
        row: usize,
        next: Vertex,
        end: Vertex,
    },
    Sparse(Rev<slice::Iter<'g, Vertex>>),
}

impl<'g> Successors<'g> {
    /// Cursor over row `u` of an `n × n` bit table.
    pub(super) const fn dense(table: &'g FixedBitSet, u: Vertex, n: usize) -> Self {
        Self {
            inner: Cursor::Dense {
                table,
                row: u * n,
                next: 0,
                end: n,
            },
        }
    }

    /// Cursor over a successor list stored in insertion order.
    pub(super) fn sparse(list: &'g [Vertex]) -> Self {
        Self {
            inner: Cursor::Sparse(list.iter().rev()),
        }
    }
}

impl Iterator for Successors<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        match &mut self.inner {
            Cursor::Dense {
                table,
                row,
                next,
                end,
            } => {
                while *next < *end {
                    let v = *next;
                    *next += 1;
                    if table.contains(*row + v) {
                        return Some(v);
                    }
                }
                None
            }
            Cursor::Sparse(iter) => iter.next().copied(),
        }
    }
}

impl FusedIterator for Successors<'_> {}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How depth-first searches walk the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Call-stack recursion, failing once `max_depth` nested visits are active.
    Recursive { max_depth: usize },
    /// Explicit stack of successor cursors; bounded only by heap memory.
    #[default]
    Iterative,
}

impl Traversal {
    /// Recursive traversal with [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub const fn recursive() -> Self {
        Self::Recursive {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// The depth limit actually enforced, `None` for [`Traversal::Iterative`].
    #[must_use]
    pub const fn depth_limit(self) -> Option<usize> {
        match self {
            Self::Recursive { max_depth } if max_depth > MAX_RECURSION_DEPTH => {
                Some(MAX_RECURSION_DEPTH)
            }
            Self::Recursive { max_depth } => Some(max_depth),
            Self::Iterative => None,
        }
    }
}

/// Stack size that fits `max_depth` nested visits.
const fn stack_bytes(max_depth: usize) -> usize {
    BASE_STACK_BYTES + (max_depth + 1) * FRAME_BYTES
}

/// Run `f`, which performs depth-first searches with `traversal`, on a
/// stack large enough for the traversal's depth limit.
///
/// Iterative traversals run `f` in place. Recursive ones run it on a scoped
/// thread; a panic inside `f` is resumed on the caller.
///
/// # Errors
///
/// Whatever `f` returns, or [`GraphError::StackReservation`] if the thread
/// cannot be started.
pub(crate) fn on_traversal_stack<T, F>(traversal: Traversal, f: F) -> Result<T, GraphError>
where
    T: Send,
    F: FnOnce() -> Result<T, GraphError> + Send,
{
    let Some(max_depth) = traversal.depth_limit() else {
        return f();
    };
    let bytes = stack_bytes(max_depth);

    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("kosa-dfs".to_string())
            .stack_size(bytes)
            .spawn_scoped(scope, f)
            .map_err(|_| GraphError::StackReservation { bytes })?;
        handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
    })
}

// ---------------------------------------------------------------------------
// Depth-first driver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Continue,
    Stop,
}

/// Hooks invoked by [`depth_first`].
pub(crate) trait DfsVisitor {
    /// `v` has just been marked. `parent` is the vertex whose successor
    /// cursor produced it (`None` for the root).
    fn discover(&mut self, v: Vertex, parent: Option<Vertex>) -> Control;

    /// Every successor of `v` has been explored.
    fn finish(&mut self, _v: Vertex) {}
}

/// Run one depth-first search from `root` over unmarked vertices.
///
/// Recursive searches must run inside [`on_traversal_stack`].
/// `root` must be unmarked. `marked` is shared across calls so an outer loop
/// can grow a forest. Returns [`Control::Stop`] if the visitor cut the
/// search short.
pub(crate) fn depth_first<V: DfsVisitor>(
    graph: &Graph,
    root: Vertex,
    marked: &mut FixedBitSet,
    traversal: Traversal,
    visitor: &mut V,
) -> Result<Control, GraphError> {
    match traversal.depth_limit() {
        Some(max_depth) => visit_recursive(graph, root, None, marked, visitor, 0, max_depth),
        None => Ok(visit_iterative(graph, root, marked, visitor)),
    }
}

fn visit_recursive<V: DfsVisitor>(
    graph: &Graph,
    v: Vertex,
    parent: Option<Vertex>,
    marked: &mut FixedBitSet,
    visitor: &mut V,
    depth: usize,
    max_depth: usize,
) -> Result<Control, GraphError> {
    if depth > max_depth {
        return Err(GraphError::RecursionLimit { limit: max_depth });
    }

    marked.insert(v);
    if visitor.discover(v, parent) == Control::Stop {
        return Ok(Control::Stop);
    }

    for w in graph.successors(v) {
        if !marked.contains(w)
            && visit_recursive(graph, w, Some(v), marked, visitor, depth + 1, max_depth)?
                == Control::Stop
        {
            return Ok(Control::Stop);
        }
    }

    visitor.finish(v);
    Ok(Control::Continue)
}

fn visit_iterative<V: DfsVisitor>(
    graph: &Graph,
    root: Vertex,
    marked: &mut FixedBitSet,
    visitor: &mut V,
) -> Control {
    marked.insert(root);
    if visitor.discover(root, None) == Control::Stop {
        return Control::Stop;
    }

    let mut stack: Vec<(Vertex, Successors<'_>)> = vec![(root, graph.successors(root))];

    while let Some((top, cursor)) = stack.last_mut() {
        let v = *top;
        match cursor.find(|&w| !marked.contains(w)) {
            Some(w) => {
                marked.insert(w);
                if visitor.discover(w, Some(v)) == Control::Stop {
                    return Control::Stop;
                }
                stack.push((w, graph.successors(w)));
            }
            None => {
                stack.pop();
                visitor.finish(v);
            }
        }
    }

    Control::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Representation;

    #[derive(Default)]
    struct Trace {
        discovered: Vec<(Vertex, Option<Vertex>)>,
        finished: Vec<Vertex>,
    }

    impl DfsVisitor for Trace {
        fn discover(&mut self, v: Vertex, parent: Option<Vertex>) -> Control {
            self.discovered.push((v, parent));
            Control::Continue
        }

        fn finish(&mut self, v: Vertex) {
            self.finished.push(v);
        }
    }

    fn diamond(repr: Representation) -> Graph {
        let mut g = Graph::new(4, false, repr).expect("graph");
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            g.add_edge(u, v).expect("edge");
        }
        g
    }

    fn trace(g: &Graph, traversal: Traversal) -> Trace {
        let mut marked = FixedBitSet::with_capacity(g.size());
        let mut t = Trace::default();
        depth_first(g, 0, &mut marked, traversal, &mut t).expect("dfs");
        t
    }

    #[test]
    fn dense_cursor_is_ascending() {
        let g = diamond(Representation::Dense);
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn sparse_cursor_is_newest_first() {
        let g = diamond(Representation::Sparse);
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn cursor_clone_restarts_independently() {
        let g = diamond(Representation::Dense);
        let mut a = g.successors(0);
        let b = a.clone();
        assert_eq!(a.next(), Some(1));
        assert_eq!(b.collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn recursive_and_iterative_agree_on_dense() {
        let g = diamond(Representation::Dense);
        let rec = trace(&g, Traversal::recursive());
        let it = trace(&g, Traversal::Iterative);

        assert_eq!(rec.discovered, vec![(0, None), (1, Some(0)), (3, Some(1)), (2, Some(0))]);
        assert_eq!(rec.finished, vec![3, 1, 2, 0]);
        assert_eq!(rec.discovered, it.discovered);
        assert_eq!(rec.finished, it.finished);
    }

    #[test]
    fn recursive_and_iterative_agree_on_sparse() {
        let g = diamond(Representation::Sparse);
        let rec = trace(&g, Traversal::recursive());
        let it = trace(&g, Traversal::Iterative);

        assert_eq!(rec.finished, vec![3, 2, 1, 0]);
        assert_eq!(rec.discovered, it.discovered);
        assert_eq!(rec.finished, it.finished);
    }

    #[test]
    fn recursion_limit_is_reported() {
        let mut g = Graph::new(6, false, Representation::Sparse).expect("graph");
        for v in 0..5 {
            g.add_edge(v, v + 1).expect("edge");
        }
        let mut marked = FixedBitSet::with_capacity(6);
        let err = depth_first(
            &g,
            0,
            &mut marked,
            Traversal::Recursive { max_depth: 3 },
            &mut Trace::default(),
        )
        .expect_err("chain deeper than limit");
        assert_eq!(err, GraphError::RecursionLimit { limit: 3 });
    }

    #[test]
    fn visitor_can_stop_the_search() {
        struct StopAt(Vertex);
        impl DfsVisitor for StopAt {
            fn discover(&mut self, v: Vertex, _parent: Option<Vertex>) -> Control {
                if v == self.0 { Control::Stop } else { Control::Continue }
            }
        }

        let g = diamond(Representation::Dense);
        for traversal in [Traversal::recursive(), Traversal::Iterative] {
            let mut marked = FixedBitSet::with_capacity(4);
            let control =
                depth_first(&g, 0, &mut marked, traversal, &mut StopAt(3)).expect("dfs");
            assert_eq!(control, Control::Stop);
            assert!(!marked.contains(2), "search continued past the stop");
        }
    }

    fn chain(n: usize, repr: Representation) -> Graph {
        let mut g = Graph::new(n, false, repr).expect("graph");
        for v in 0..n - 1 {
            g.add_edge(v, v + 1).expect("edge");
        }
        g
    }

    #[test]
    fn default_depth_fits_on_traversal_stack() {
        let n = DEFAULT_MAX_DEPTH - 1;
        for repr in [Representation::Dense, Representation::Sparse] {
            let g = chain(n, repr);
            let mut marked = FixedBitSet::with_capacity(n);
            let mut trace = Trace::default();
            let control = on_traversal_stack(Traversal::recursive(), || {
                depth_first(&g, 0, &mut marked, Traversal::recursive(), &mut trace)
            })
            .expect("deep chain within the limit");

            assert_eq!(control, Control::Continue);
            assert_eq!(trace.finished.len(), n);
            assert_eq!(trace.finished.first(), Some(&(n - 1)));
        }
    }

    #[test]
    fn limit_error_crosses_the_stack_thread() {
        let g = chain(64, Representation::Sparse);
        let limited = Traversal::Recursive { max_depth: 8 };
        let mut marked = FixedBitSet::with_capacity(64);
        let err = on_traversal_stack(limited, || {
            depth_first(&g, 0, &mut marked, limited, &mut Trace::default())
        })
        .expect_err("chain deeper than limit");
        assert_eq!(err, GraphError::RecursionLimit { limit: 8 });
    }

    #[test]
    fn oversized_limits_are_clamped() {
        let huge = Traversal::Recursive {
            max_depth: usize::MAX,
        };
        assert_eq!(huge.depth_limit(), Some(MAX_RECURSION_DEPTH));
        assert_eq!(Traversal::recursive().depth_limit(), Some(DEFAULT_MAX_DEPTH));
        assert_eq!(Traversal::Iterative.depth_limit(), None);
    }

    #[test]
    fn iterative_runs_in_place() {
        let caller = std::thread::current().id();
        let ran_on = on_traversal_stack(Traversal::Iterative, || Ok(std::thread::current().id()))
            .expect("in place");
        assert_eq!(ran_on, caller);
    }
}
