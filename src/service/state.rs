//! Service state management.
//!
//! Contains the PolicyRegistry and one cached tester per registered policy.
//! All testers share a single outcome cache, and the registry is capped, so
//! clients registering policies cannot grow memory without bound.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::planarity::{CacheConfig, CacheStats, CachedTester, OutcomeCache, PlanarityTester};
use crate::policy::PlanarityPolicyV1;

/// Reference to a registered policy by hash.
///
/// This enables hash-stable policy references across requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyRef {
    /// Policy type identifier (e.g., "planarity_policy_v1")
    pub policy_id: String,
    /// xxHash64 of canonical policy JSON
    pub params_hash: String,
}

impl PolicyRef {
    /// Create a policy reference from a PlanarityPolicyV1.
    pub fn from_policy(policy: &PlanarityPolicyV1) -> Self {
        Self {
            policy_id: policy.policy_id().to_string(),
            params_hash: policy.params_hash(),
        }
    }

    /// Create a reference with explicit values.
    pub fn new(policy_id: impl Into<String>, params_hash: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            params_hash: params_hash.into(),
        }
    }
}

/// Default cap on the number of registered policies.
pub const DEFAULT_MAX_POLICIES: usize = 64;

/// Error type for policy registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry already holds its maximum number of policies.
    #[error("Policy registry is full ({limit} policies)")]
    Full {
        /// Configured maximum.
        limit: usize,
    },
}

/// Registry of immutable policies with stable hashes.
///
/// The registry itself has a fingerprint that changes when policies change.
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    policies: BTreeMap<PolicyRef, PlanarityPolicyV1>,
    registry_fingerprint: String,
    max_policies: usize,
}

impl PolicyRegistry {
    /// Create a new empty registry with the default cap.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_POLICIES)
    }

    /// Create a new empty registry holding at most `max_policies` policies.
    pub fn with_limit(max_policies: usize) -> Self {
        let mut registry = Self {
            policies: BTreeMap::new(),
            registry_fingerprint: String::new(),
            max_policies,
        };
        registry.update_fingerprint();
        registry
    }

    /// Create a registry with the default and exhaustive policies registered.
    pub fn with_defaults() -> Self {
        Self::with_defaults_and_limit(DEFAULT_MAX_POLICIES)
    }

    /// Like [`with_defaults`](Self::with_defaults) with a custom cap.
    ///
    /// The built-in policies are always present, even past the cap.
    pub fn with_defaults_and_limit(max_policies: usize) -> Self {
        let mut registry = Self::with_limit(max_policies);
        for policy in [PlanarityPolicyV1::default(), PlanarityPolicyV1::exhaustive()] {
            registry.policies.insert(PolicyRef::from_policy(&policy), policy);
        }
        registry.update_fingerprint();
        registry
    }

    /// Register a policy and return its reference.
    ///
    /// If the policy already exists (same hash), returns the existing
    /// reference even when the registry is full.
    pub fn register(&mut self, policy: PlanarityPolicyV1) -> Result<PolicyRef, RegistryError> {
        let policy_ref = PolicyRef::from_policy(&policy);

        if !self.policies.contains_key(&policy_ref) {
            if self.policies.len() >= self.max_policies {
                return Err(RegistryError::Full { limit: self.max_policies });
            }
            self.policies.insert(policy_ref.clone(), policy);
            self.update_fingerprint();
        }

        Ok(policy_ref)
    }

    /// Resolve a policy reference to the actual policy.
    pub fn resolve(&self, policy_ref: &PolicyRef) -> Option<&PlanarityPolicyV1> {
        self.policies.get(policy_ref)
    }

    /// Look up a policy by its params hash alone.
    pub fn find_by_hash(&self, params_hash: &str) -> Option<(&PolicyRef, &PlanarityPolicyV1)> {
        self.policies.iter().find(|(r, _)| r.params_hash == params_hash)
    }

    /// Get all registered policy references.
    pub fn list(&self) -> Vec<PolicyRef> {
        self.policies.keys().cloned().collect()
    }

    /// Get the registry fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.registry_fingerprint
    }

    /// Get the number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Maximum number of policies.
    pub fn limit(&self) -> usize {
        self.max_policies
    }

    fn update_fingerprint(&mut self) {
        let refs: Vec<_> = self.policies.keys().collect();
        self.registry_fingerprint = canonical_hash_hex(&refs);
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Shared service state.
#[derive(Debug, Clone)]
pub struct ServiceState {
    /// Registry of available policies.
    pub policy_registry: Arc<RwLock<PolicyRegistry>>,
    /// At most one tester per registered policy.
    testers: Arc<RwLock<BTreeMap<PolicyRef, CachedTester>>>,
    /// Shared by every tester; keys include the policy.
    cache: Option<OutcomeCache>,
}

impl ServiceState {
    /// Create service state with the default registry.
    pub fn new(cache_config: CacheConfig) -> Self {
        Self::with_registry(PolicyRegistry::with_defaults(), cache_config)
    }

    /// Create service state with a custom policy registry.
    pub fn with_registry(registry: PolicyRegistry, cache_config: CacheConfig) -> Self {
        Self {
            policy_registry: Arc::new(RwLock::new(registry)),
            testers: Arc::new(RwLock::new(BTreeMap::new())),
            cache: OutcomeCache::from_config(&cache_config),
        }
    }

    /// Create service state from environment variables.
    ///
    /// Reads `EMBED_CACHE_SIZE` (0 disables the cache) and
    /// `POLICY_REGISTRY_LIMIT` (maximum registered policies).
    pub fn from_env() -> Self {
        let cache_config = match std::env::var("EMBED_CACHE_SIZE").ok().and_then(|s| s.parse::<usize>().ok()) {
            Some(0) => CacheConfig { enabled: false, ..CacheConfig::default() },
            Some(max_entries) => CacheConfig { max_entries, enabled: true },
            None => CacheConfig::default(),
        };
        tracing::info!(
            enabled = cache_config.enabled,
            max_entries = cache_config.max_entries,
            "Outcome cache configured"
        );
        let max_policies = std::env::var("POLICY_REGISTRY_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_POLICIES);
        Self::with_registry(PolicyRegistry::with_defaults_and_limit(max_policies), cache_config)
    }

    /// Resolve a policy reference (or the default policy) to a cached tester.
    ///
    /// Returns `None` if the reference is not registered.
    pub fn tester(&self, policy_ref: Option<&PolicyRef>) -> Option<(PolicyRef, CachedTester)> {
        let (policy_ref, policy) = match policy_ref {
            Some(r) => (r.clone(), self.policy_registry.read().resolve(r)?.clone()),
            None => {
                let policy = PlanarityPolicyV1::default();
                (PolicyRef::from_policy(&policy), policy)
            }
        };

        if let Some(tester) = self.testers.read().get(&policy_ref) {
            return Some((policy_ref, tester.clone()));
        }
        let tester = self
            .testers
            .write()
            .entry(policy_ref.clone())
            .or_insert_with(|| CachedTester::with_cache(PlanarityTester::new(policy), self.cache.clone()))
            .clone();
        Some((policy_ref, tester))
    }

    /// Statistics of the shared outcome cache.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(OutcomeCache::stats)
    }

    /// Number of testers created so far.
    pub fn tester_count(&self) -> usize {
        self.testers.read().len()
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
