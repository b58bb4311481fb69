//! The [`Graph`] type: fixed vertex set, dual-backed edge relation, names.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::str::FromStr;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::names::VertexNames;
use super::traverse::Successors;
use super::GraphError;

/// Dense integer vertex handle in `[0, size)`.
pub type Vertex = usize;

/// Which backing stores the edge relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// `n × n` bit table.
    Dense,
    /// One successor list per vertex.
    #[default]
    Sparse,
}

impl Representation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" | "matrix" => Ok(Self::Dense),
            "sparse" | "list" => Ok(Self::Sparse),
            other => Err(format!(
                "unknown representation '{other}' (expected 'dense' or 'sparse')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edges {
    /// Bit `u * n + v` is set iff `u -> v`.
    Dense(FixedBitSet),
    /// `lists[u]` holds successors of `u` in insertion order.
    Sparse(Vec<Vec<Vertex>>),
}

/// A directed graph over the vertex handles `0..size`.
///
/// The size and [`Representation`] are fixed at construction. Edges are only
/// ever added. Dropping the graph releases everything it owns; no two graphs
/// share storage, including a graph and its [`reverse`](Graph::reverse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    size: usize,
    edges: Edges,
    edge_count: usize,
    names: Option<VertexNames>,
}

impl Graph {
    /// Create a graph of `size` vertices with no edges.
    ///
    /// With `with_names`, every vertex gets an empty name slot that must be
    /// filled with [`set_vertex_name`](Self::set_vertex_name) before the
    /// graph is [complete](Self::is_complete).
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyGraph`] if `size == 0`, [`GraphError::Allocation`]
    /// if the backing cannot be reserved (a dense table needs `size²` bits).
    pub fn new(
        size: usize,
        with_names: bool,
        representation: Representation,
    ) -> Result<Self, GraphError> {
        if size == 0 {
            return Err(GraphError::EmptyGraph);
        }

        let alloc_failed = || GraphError::Allocation {
            size,
            representation,
        };

        let edges = match representation {
            Representation::Dense => {
                let bits = size.checked_mul(size).ok_or_else(alloc_failed)?;
                let block_count = bits.div_ceil(32);
                let mut blocks: Vec<u32> = Vec::new();
                blocks
                    .try_reserve_exact(block_count)
                    .map_err(|_| alloc_failed())?;
                blocks.resize(block_count, 0);
                Edges::Dense(FixedBitSet::with_capacity_and_blocks(bits, blocks))
            }
            Representation::Sparse => {
                let mut lists: Vec<Vec<Vertex>> = Vec::new();
                lists.try_reserve_exact(size).map_err(|_| alloc_failed())?;
                lists.resize_with(size, Vec::new);
                Edges::Sparse(lists)
            }
        };

        let names = if with_names {
            Some(VertexNames::with_slots(size).map_err(|_| alloc_failed())?)
        } else {
            None
        };

        Ok(Self {
            size,
            edges,
            edge_count: 0,
            names,
        })
    }

    /// Number of vertices.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self.edges {
            Edges::Dense(_) => Representation::Dense,
            Edges::Sparse(_) => Representation::Sparse,
        }
    }

    /// Number of distinct edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    const fn check(&self, v: Vertex) -> Result<(), GraphError> {
        if v < self.size {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex: v,
                size: self.size,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Insert `from -> to`. Returns `false` if the edge was already present.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexOutOfRange`] if either handle is `>= size`.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex) -> Result<bool, GraphError> {
        self.check(from)?;
        self.check(to)?;

        let inserted = match &mut self.edges {
            Edges::Dense(table) => !table.put(from * self.size + to),
            Edges::Sparse(lists) => {
                let list = &mut lists[from];
                if list.contains(&to) {
                    false
                } else {
                    list.push(to);
                    true
                }
            }
        };

        if inserted {
            self.edge_count += 1;
        }
        Ok(inserted)
    }

    /// `true` iff `from -> to` is present. Out-of-range handles are absent.
    #[must_use]
    pub fn has_edge(&self, from: Vertex, to: Vertex) -> bool {
        if from >= self.size || to >= self.size {
            return false;
        }
        match &self.edges {
            Edges::Dense(table) => table.contains(from * self.size + to),
            Edges::Sparse(lists) => lists[from].contains(&to),
        }
    }

    /// Cursor over the successors of `u` in the backing's native order.
    ///
    /// # Panics
    ///
    /// Panics if `u >= size`.
    #[must_use]
    pub fn successors(&self, u: Vertex) -> Successors<'_> {
        assert!(u < self.size, "vertex {u} out of range for graph of size {}", self.size);
        match &self.edges {
            Edges::Dense(table) => Successors::dense(table, u, self.size),
            Edges::Sparse(lists) => Successors::sparse(&lists[u]),
        }
    }

    /// Call `visit` once per distinct successor of `u`, in native order.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexOutOfRange`] if `u >= size`.
    pub fn for_each_successor(
        &self,
        u: Vertex,
        mut visit: impl FnMut(Vertex),
    ) -> Result<(), GraphError> {
        self.check(u)?;
        self.successors(u).for_each(&mut visit);
        Ok(())
    }

    /// Number of successors of `u` (0 when out of range).
    #[must_use]
    pub fn out_degree(&self, u: Vertex) -> usize {
        if u >= self.size {
            return 0;
        }
        match &self.edges {
            Edges::Sparse(lists) => lists[u].len(),
            Edges::Dense(_) => self.successors(u).count(),
        }
    }

    /// Every edge `(u, v)`, grouped by `u` ascending, successors in native order.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        (0..self.size).flat_map(move |u| self.successors(u).map(move |v| (u, v)))
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn has_names(&self) -> bool {
        self.names.is_some()
    }

    /// Give vertex `v` the name `name`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NamesDisabled`] on an unnamed graph,
    /// [`GraphError::VertexOutOfRange`] for a bad handle,
    /// [`GraphError::DuplicateName`] if another vertex already has `name`.
    pub fn set_vertex_name(&mut self, v: Vertex, name: impl Into<String>) -> Result<(), GraphError> {
        self.check(v)?;
        let names = self.names.as_mut().ok_or(GraphError::NamesDisabled)?;
        names.assign(v, name.into())
    }

    /// Name of `v`, or `None` if the graph is unnamed, `v` is out of range,
    /// or the slot has not been assigned yet.
    #[must_use]
    pub fn vertex_name(&self, v: Vertex) -> Option<&str> {
        self.names.as_ref().and_then(|names| names.name(v))
    }

    /// Handle carrying `name`, or `None` if there is no such vertex.
    #[must_use]
    pub fn vertex_from_name(&self, name: &str) -> Option<Vertex> {
        self.names.as_ref().and_then(|names| names.vertex(name))
    }

    /// `true` unless the graph is named and some slot is still empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.names.as_ref().is_none_or(VertexNames::is_complete)
    }

    /// Display label for `v`: its name when present, else the decimal handle.
    #[must_use]
    pub fn label(&self, v: Vertex) -> String {
        self.vertex_name(v)
            .map_or_else(|| v.to_string(), ToString::to_string)
    }

    // -----------------------------------------------------------------------
    // Transpose
    // -----------------------------------------------------------------------

    /// Build the transpose: same size, representation and names, with
    /// `(u, v)` present iff `(v, u)` is present here.
    ///
    /// Runs one pass over every vertex's successors, `O(|V| + |E|)` for the
    /// sparse backing. The result owns independent storage.
    ///
    /// # Errors
    ///
    /// [`GraphError::Allocation`] if the new backing cannot be reserved.
    #[instrument(level = "debug", skip(self), fields(size = self.size, repr = %self.representation()))]
    pub fn reverse(&self) -> Result<Self, GraphError> {
        let mut rev = Self::new(self.size, false, self.representation())?;
        rev.names.clone_from(&self.names);

        for u in 0..self.size {
            for v in self.successors(u) {
                rev.add_edge(v, u)?;
            }
        }

        debug!(edges = rev.edge_count, "transpose built");
        Ok(rev)
    }
}

/// Adjacency listing, one `u: s1 s2 ...` line per vertex.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for u in 0..self.size {
            write!(f, "{}:", self.label(u))?;
            for v in self.successors(u) {
                write!(f, " {}", self.label(v))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
