//! Cached planarity testing.
//!
//! Repeated tests of the same graph under the same policy are common in
//! services that re-check embeddings on every request. [`CachedTester`]
//! memoizes outcomes in an LRU cache.
//!
//! ## Cache Key Design
//!
//! The key is derived from everything that affects the outcome:
//! - graph fingerprint (vertex and edge sets)
//! - start vertex
//! - policy id and params hash
//!
//! Any change to these results in a cache miss and a full test. Errors are
//! never cached.
//!
//! Because the policy is part of the key, testers for different policies
//! can share one [`OutcomeCache`] and stay within a single capacity.
//!
//! A hit promotes the entry, so eviction is least-recently-used.

use std::hash::Hasher;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;
use xxhash_rust::xxh64::Xxh64;

use crate::graph::InMemoryGraph;
use crate::types::VertexId;
use super::{PlanarityError, PlanarityOutcome, PlanarityTester};

/// Fallback capacity when a zero-sized cache is requested.
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Configuration for the outcome cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

/// Cache key for one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OutcomeCacheKey(u64);

impl OutcomeCacheKey {
    fn compute(graph_fingerprint: &str, start: VertexId, policy_id: &str, policy_params_hash: &str) -> Self {
        let mut hasher = Xxh64::new(0);

        hasher.write(graph_fingerprint.as_bytes());
        hasher.write(&start.get().to_le_bytes());
        hasher.write(policy_id.as_bytes());
        hasher.write(policy_params_hash.as_bytes());

        Self(hasher.finish())
    }
}

/// Bounded LRU map from test inputs to outcomes.
///
/// Cloning shares the underlying cache.
#[derive(Debug, Clone)]
pub struct OutcomeCache {
    inner: Arc<RwLock<LruCache<OutcomeCacheKey, PlanarityOutcome>>>,
}

impl OutcomeCache {
    /// Create a cache holding at most `max_entries` outcomes.
    pub fn new(max_entries: usize) -> Self {
        let size = NonZeroUsize::new(max_entries).unwrap_or(DEFAULT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(LruCache::new(size))),
        }
    }

    /// Create a cache from config; `None` if caching is disabled.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config.max_entries))
    }

    /// Look up and promote. `get` reorders the LRU list, hence the write lock.
    fn get(&self, key: &OutcomeCacheKey) -> Option<PlanarityOutcome> {
        self.inner.write().get(key).cloned()
    }

    fn put(&self, key: OutcomeCacheKey, outcome: PlanarityOutcome) {
        self.inner.write().put(key, outcome);
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let cache = self.inner.read();
        CacheStats {
            len: cache.len(),
            cap: cache.cap().get(),
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

/// Outcome plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct CachedOutcome {
    /// The test outcome.
    pub outcome: PlanarityOutcome,
    /// Whether this result came from cache.
    pub cache_hit: bool,
}

/// Planarity tester with optional LRU caching.
///
/// Thread-safe and suitable for use in async services.
#[derive(Debug, Clone)]
pub struct CachedTester {
    tester: PlanarityTester,
    cache: Option<OutcomeCache>,
}

impl CachedTester {
    /// Create a new cached tester with its own cache.
    pub fn new(tester: PlanarityTester, config: CacheConfig) -> Self {
        Self::with_cache(tester, OutcomeCache::from_config(&config))
    }

    /// Create a cached tester on an existing (possibly shared) cache.
    pub fn with_cache(tester: PlanarityTester, cache: Option<OutcomeCache>) -> Self {
        Self { tester, cache }
    }

    /// The wrapped tester.
    pub fn tester(&self) -> &PlanarityTester {
        &self.tester
    }

    /// Test the component of `graph` containing `start`.
    pub fn test(&self, graph: &InMemoryGraph, start: VertexId) -> Result<CachedOutcome, PlanarityError> {
        let policy = self.tester.policy();
        let key = OutcomeCacheKey::compute(&graph.fingerprint(), start, policy.policy_id(), &policy.params_hash());

        if let Some(cache) = &self.cache {
            if let Some(outcome) = cache.get(&key) {
                return Ok(CachedOutcome {
                    outcome,
                    cache_hit: true,
                });
            }
        }

        let outcome = self.tester.test(graph, start)?;

        if let Some(cache) = &self.cache {
            cache.put(key, outcome.clone());
        }

        Ok(CachedOutcome {
            outcome,
            cache_hit: false,
        })
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(OutcomeCache::stats)
    }

    /// Clear the cache.
    ///
    /// Does nothing if caching is disabled.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}
