//! Bijective vertex ↔ name map backing named graphs.

use std::collections::{HashMap, TryReserveError};

use super::{GraphError, Vertex};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct VertexNames {
    by_vertex: Vec<Option<String>>,
    by_name: HashMap<String, Vertex>,
}

impl VertexNames {
    /// Empty map with room for `size` vertices, reserved fallibly.
    pub(super) fn with_slots(size: usize) -> Result<Self, TryReserveError> {
        let mut by_vertex = Vec::new();
        by_vertex.try_reserve_exact(size)?;
        by_vertex.resize(size, None);

        let mut by_name = HashMap::new();
        by_name.try_reserve(size)?;

        Ok(Self { by_vertex, by_name })
    }

    pub(super) fn name(&self, v: Vertex) -> Option<&str> {
        self.by_vertex.get(v).and_then(Option::as_deref)
    }

    pub(super) fn vertex(&self, name: &str) -> Option<Vertex> {
        self.by_name.get(name).copied()
    }

    /// Assign `name` to `v`, replacing any earlier name of `v`.
    ///
    /// The caller has already range-checked `v`.
    pub(super) fn assign(&mut self, v: Vertex, name: String) -> Result<(), GraphError> {
        if let Some(&existing) = self.by_name.get(&name) {
            if existing == v {
                return Ok(());
            }
            return Err(GraphError::DuplicateName { name, existing });
        }

        if let Some(old) = self.by_vertex[v].take() {
            self.by_name.remove(&old);
        }
        self.by_name.insert(name.clone(), v);
        self.by_vertex[v] = Some(name);
        Ok(())
    }

    pub(super) fn is_complete(&self) -> bool {
        self.by_name.len() == self.by_vertex.len()
    }
}
