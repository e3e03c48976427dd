//! Vertex identifiers for the planarity kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an input vertex.
///
/// Wraps a `u32` and implements `Ord` for deterministic ordering of
/// rotation maps and fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Create a new VertexId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parse a VertexId from its decimal form.
    pub fn from_str(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }

    /// Get the raw identifier.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
