//! Linear-time planarity testing by edge addition.
//!
//! [`PlanarityTester`] decides whether the connected component containing a
//! start vertex is planar and, if it is, returns a combinatorial
//! [`Embedding`] of it.
//!
//! ## Pipeline
//!
//! ```text
//! AdjacencyGraph → palm tree → (Euler bound) → for v = n-1 .. 0:
//!                                                 walk-up per back edge
//!                                                 walk-down per child root
//!                                             → assemble → Embedding
//! ```
//!
//! Vertices are processed in reverse DFS order. Each step embeds every back
//! edge from `v` to its descendants while keeping all vertices that still
//! need an edge on the external face. A back edge that cannot be embedded
//! proves the component non-planar.
//!
//! ## Determinism
//!
//! Same graph (same neighbor order) + same start vertex → identical
//! embedding. All state lives in per-call arenas.

mod arena;
mod assemble;
pub mod cache;
mod merge;
mod palm_tree;
mod walkdown;
mod walkup;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embedding::{Embedding, EmbeddingError};
use crate::graph::{AdjacencyGraph, GraphError};
use crate::policy::PlanarityPolicyV1;
use crate::types::VertexId;

pub use cache::{CacheConfig, CacheStats, CachedOutcome, CachedTester, OutcomeCache};

/// Error type for planarity testing.
///
/// A non-planar graph is not an error; see [`PlanarityOutcome::NotPlanar`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanarityError {
    /// Start vertex not present in the graph.
    #[error("Start vertex not found: {0}")]
    StartVertexNotFound(VertexId),
    /// The graph violates the simple-graph contract.
    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
    /// Component larger than the policy allows.
    #[error("Component exceeds the vertex budget of {limit}")]
    ComponentTooLarge {
        /// Configured maximum.
        limit: usize,
    },
    /// The engine produced an embedding that failed its self-check.
    #[error("Internal invariant violated: {0}")]
    Internal(#[from] EmbeddingError),
}

/// Why a component is not planar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NonPlanarReason {
    /// More edges than any planar graph on this many vertices can have.
    EulerBound {
        /// Vertices in the component.
        vertices: usize,
        /// Edges in the component.
        edges: usize,
    },
    /// A back edge to this vertex could not be embedded.
    UnembeddedBackEdge {
        /// The ancestor endpoint of the failed back edge.
        vertex: VertexId,
    },
}

/// Result of a planarity test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum PlanarityOutcome {
    /// The component is planar.
    Planar(Embedding),
    /// The component is not planar.
    NotPlanar(NonPlanarReason),
}

impl PlanarityOutcome {
    /// Check whether the component is planar.
    pub fn is_planar(&self) -> bool {
        matches!(self, Self::Planar(_))
    }

    /// Borrow the embedding, if planar.
    pub fn embedding(&self) -> Option<&Embedding> {
        match self {
            Self::Planar(embedding) => Some(embedding),
            Self::NotPlanar(_) => None,
        }
    }

    /// Take the embedding, if planar.
    pub fn into_embedding(self) -> Option<Embedding> {
        match self {
            Self::Planar(embedding) => Some(embedding),
            Self::NotPlanar(_) => None,
        }
    }
}

/// Planarity tester.
///
/// Stateless apart from its policy; every call builds and drops its own
/// arenas, so one tester can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PlanarityTester {
    policy: PlanarityPolicyV1,
}

impl PlanarityTester {
    /// Create a new tester.
    pub fn new(policy: PlanarityPolicyV1) -> Self {
        Self { policy }
    }

    /// Get the policy.
    pub fn policy(&self) -> &PlanarityPolicyV1 {
        &self.policy
    }

    /// Test the component containing `start`.
    ///
    /// Vertices not reachable from `start` are ignored.
    pub fn test<G: AdjacencyGraph + ?Sized>(
        &self,
        graph: &G,
        start: VertexId,
    ) -> Result<PlanarityOutcome, PlanarityError> {
        let mut arena = palm_tree::build(graph, start, &self.policy)?;
        let vertices = arena.n();
        let edges = arena.num_edges;

        debug!(%start, vertices, edges, "Palm tree built");

        if self.policy.euler_fast_path && vertices >= 3 && edges > 3 * vertices - 6 {
            debug!(vertices, edges, "Rejected by edge count");
            return Ok(PlanarityOutcome::NotPlanar(NonPlanarReason::EulerBound { vertices, edges }));
        }

        for v in (0..vertices).rev() {
            arena.generation += 1;
            let sources = std::mem::take(&mut arena.vertices[v].back_edge_sources);
            for &w in &sources {
                walkup::walkup(&mut arena, v, w);
            }

            let mut embedded = 0;
            for child in arena.separated_children(v) {
                for vout in 0..2 {
                    let result = walkdown::walkdown(&mut arena, v, child, vout);
                    embedded += result.embedded;
                    if result.blocked {
                        break;
                    }
                }
            }

            if embedded < sources.len() {
                let vertex = arena.vertices[v].id;
                debug!(%vertex, embedded, expected = sources.len(), "Back edge could not be embedded");
                return Ok(PlanarityOutcome::NotPlanar(NonPlanarReason::UnembeddedBackEdge { vertex }));
            }
        }

        let embedding = assemble::assemble(&mut arena)?;

        if self.policy.verify_embedding {
            if let Err(e) = embedding.validate().and_then(|()| embedding.validate_against(graph)) {
                warn!(error = %e, %start, "Embedding failed self-check");
                return Err(PlanarityError::Internal(e));
            }
        }

        debug!(vertices, edges, faces = edges + 2 - vertices, "Planar");
        Ok(PlanarityOutcome::Planar(embedding))
    }
}
