//! Graph access for the planarity engine.
//!
//! The engine only needs to enumerate vertices and their neighbor sets, so
//! the container is abstracted behind a small read-only trait.

pub mod memory;

use crate::types::VertexId;

/// Read-only adjacency access to a simple undirected graph.
///
/// Implementations must be symmetric (`u` lists `v` iff `v` lists `u`),
/// must not report self loops or duplicate neighbors, and should return
/// neighbors in a deterministic order so repeated runs produce identical
/// embeddings.
pub trait AdjacencyGraph {
    /// Check whether the vertex exists.
    fn contains_vertex(&self, v: VertexId) -> bool;

    /// Neighbors of `v` (empty for unknown vertices).
    fn neighbors(&self, v: VertexId) -> Vec<VertexId>;

    /// Number of neighbors of `v`.
    fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }
}

pub use memory::{GraphError, InMemoryGraph};
