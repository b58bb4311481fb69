//! Directed graph store and the traversal interface shared by every engine.
//!
//! # Overview
//!
//! A [`Graph`] has a fixed vertex count `n` chosen at construction. Vertices
//! are dense integer handles in `[0, n)` and are never removed. Edges live in
//! one of two backings selected by [`Representation`]:
//!
//! - **Dense**: an `n × n` bit table. `O(1)` insert and lookup, `O(n)` to
//!   enumerate one vertex's successors.
//! - **Sparse**: one successor list per vertex. Insert and lookup scan the
//!   list (`O(out-degree)`) so the relation never holds a multi-edge.
//!
//! The backing is private and fixed for the graph's lifetime; callers only
//! see the common API.
//!
//! ## Successor order
//!
//! [`Graph::successors`] yields every distinct successor exactly once, but
//! the order depends on the backing:
//!
//! | Backing | Order |
//! |---------|-------|
//! | Dense   | ascending handle |
//! | Sparse  | most recently inserted first |
//!
//! The order feeds straight into depth-first traversals, so it is visible in
//! downstream output (member order inside a printed component, the DOT edge
//! listing, which path witness is found first). It is deliberately not
//! normalised.
//!
//! ## Names
//!
//! A graph created `with_names` carries a bijective handle ↔ string map.
//! Lookups in both directions are total once every slot has been assigned
//! (see [`Graph::is_complete`]).
//!
//! ```rust,ignore
//! use kosa_core::graph::{Graph, Representation};
//!
//! let mut g = Graph::new(3, false, Representation::Sparse)?;
//! g.add_edge(0, 1)?;
//! g.add_edge(1, 2)?;
//! let gt = g.reverse()?;
//! assert!(gt.has_edge(2, 1));
//! ```

mod names;
pub mod store;
pub mod traverse;

use crate::error::ErrorCode;

pub use store::{Graph, Representation, Vertex};
pub use traverse::{DEFAULT_MAX_DEPTH, MAX_RECURSION_DEPTH, Successors, Traversal};

/// Errors raised by the graph store and the traversal engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A graph needs at least one vertex.
    #[error("graph size must be positive")]
    EmptyGraph,

    /// A handle outside `[0, size)` was passed in.
    #[error("vertex {vertex} out of range for graph of size {size}")]
    VertexOutOfRange { vertex: Vertex, size: usize },

    /// A naming operation on a graph created without names.
    #[error("graph was created without vertex names")]
    NamesDisabled,

    /// The name is already held by another vertex.
    #[error("vertex name {name:?} is already assigned to vertex {existing}")]
    DuplicateName { name: String, existing: Vertex },

    /// Backing storage could not be reserved.
    #[error("cannot allocate {representation} storage for {size} vertices")]
    Allocation {
        size: usize,
        representation: Representation,
    },

    /// No thread stack large enough for a recursive traversal could be reserved.
    #[error("cannot reserve a {bytes}-byte stack for recursive traversal")]
    StackReservation { bytes: usize },

    /// A recursive traversal went deeper than its configured limit.
    #[error("depth-first traversal exceeded the recursion limit of {limit}")]
    RecursionLimit { limit: usize },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyGraph => ErrorCode::EmptyGraph,
            Self::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::NamesDisabled => ErrorCode::NamesDisabled,
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
            Self::Allocation { .. } | Self::StackReservation { .. } => ErrorCode::AllocationFailed,
            Self::RecursionLimit { .. } => ErrorCode::RecursionLimit,
        }
    }

    /// `true` for failures caused by input size rather than bad input.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::Allocation { .. } | Self::StackReservation { .. } | Self::RecursionLimit { .. }
        )
    }
}
