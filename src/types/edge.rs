//! Undirected edge type.

use serde::{Deserialize, Serialize};
use super::vertex::VertexId;

/// Undirected edge between two distinct vertices.
///
/// The endpoints are stored in canonical order (`lo < hi`), so two edges
/// compare equal regardless of the order they were created in, and the
/// derived `Ord` gives the deterministic (lo, hi) ordering used for hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Smaller endpoint.
    pub lo: VertexId,
    /// Larger endpoint.
    pub hi: VertexId,
}

impl Edge {
    /// Create a new edge. Returns `None` for a self loop.
    pub fn new(a: VertexId, b: VertexId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Get the endpoint opposite to `v`, if `v` is an endpoint.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.lo {
            Some(self.hi)
        } else if v == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Check if `v` is an endpoint.
    pub fn contains(&self, v: VertexId) -> bool {
        self.lo == v || self.hi == v
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}
