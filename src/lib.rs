//! # planarity-kernel
//!
//! Linear-time planarity testing with combinatorial embedding.
//!
//! The kernel answers one question:
//!
//! > Can this graph be drawn in the plane without crossings, and if so, how?
//!
//! ## Core Contract
//!
//! 1. Given a simple undirected graph and a start vertex, decide whether the
//!    connected component containing the start vertex is planar
//! 2. If it is, return a rotation system (clockwise neighbor order per
//!    vertex) plus the external face
//! 3. Every returned embedding passes the same validation that guards
//!    caller-supplied embeddings
//!
//! ## Architecture
//!
//! ```text
//! AdjacencyGraph → PlanarityTester → PlanarityOutcome
//!                        ↓                 ↓
//!               PlanarityPolicyV1     Embedding (rotations + external face)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same start vertex + same policy → identical embedding
//! - Fingerprints are computed over canonical JSON
//!
//! ## Example
//!
//! ```
//! use planarity_kernel::{InMemoryGraph, PlanarityTester, VertexId};
//!
//! let graph = InMemoryGraph::from_edges([(0, 1), (1, 2), (2, 0), (0, 3)]).unwrap();
//! let outcome = PlanarityTester::default().test(&graph, VertexId::new(0)).unwrap();
//! let embedding = outcome.into_embedding().unwrap();
//! assert_eq!(embedding.num_faces(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod embedding;
pub mod policy;
pub mod planarity;
pub mod canonical;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{Edge, VertexId};
pub use graph::{AdjacencyGraph, GraphError, InMemoryGraph};
pub use embedding::{Embedding, EmbeddingError, EmbeddingParts};
pub use policy::PlanarityPolicyV1;
pub use planarity::{
    CacheConfig, CacheStats, CachedOutcome, CachedTester, OutcomeCache,
    NonPlanarReason, PlanarityError, PlanarityOutcome, PlanarityTester,
};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState, PolicyRegistry, PolicyRef};

/// Schema version for all planarity kernel types.
/// Increment on breaking changes to any schema type.
pub const PLANARITY_KERNEL_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "planarity_policy_v1";
