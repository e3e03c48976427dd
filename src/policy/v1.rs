//! PlanarityPolicy v1: engine switches and budgets.
//!
//! The policy is hashed the same way graphs and embeddings are, so cached
//! outcomes and service responses can name the exact configuration that
//! produced them.

use serde::{Deserialize, Serialize};
use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_POLICY_VERSION;

/// Planarity policy version 1.
///
/// ## Parameters
///
/// - `euler_fast_path`: Reject components with `E > 3V - 6` before running
///   walk-up/walk-down
/// - `verify_embedding`: Run the validating constructor on every embedding
///   the engine produces
/// - `max_vertices`: Reject components larger than this (no cap if `None`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanarityPolicyV1 {
    /// Policy version identifier.
    pub version: String,
    /// Whether the edge-count bound may short-circuit the test.
    pub euler_fast_path: bool,
    /// Whether produced embeddings are self-checked.
    pub verify_embedding: bool,
    /// Maximum number of vertices in the tested component.
    #[serde(default)]
    pub max_vertices: Option<usize>,
}

impl PlanarityPolicyV1 {
    /// Create a new policy with custom parameters.
    pub fn new(euler_fast_path: bool, verify_embedding: bool, max_vertices: Option<usize>) -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            euler_fast_path,
            verify_embedding,
            max_vertices,
        }
    }

    /// Policy that always runs the full engine.
    ///
    /// Dense inputs then fail on an unembedded back edge instead of the edge
    /// count, which is what the non-planarity tests want to exercise.
    pub fn exhaustive() -> Self {
        Self {
            euler_fast_path: false,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Check whether a component of `vertices` vertices is within budget.
    pub fn admits(&self, vertices: usize) -> bool {
        self.max_vertices.map_or(true, |max| vertices <= max)
    }
}

impl Default for PlanarityPolicyV1 {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            euler_fast_path: true,
            verify_embedding: true,
            max_vertices: None,
        }
    }
}
