//! Time-bounded response cache.
//!
//! Successful dispatch results are memoised keyed on a content hash of
//! (normalised input text, optional explicit backend). Entries expire
//! lazily after a TTL (default one hour); an expired entry is treated
//! as absent. Failed attempts never populate the cache.
//!
//! The key space distinguishes "no explicit backend" from every explicit
//! backend: an answer cached for a free-routing request is never served
//! to a request that pinned a backend, and vice versa.
//!
//! Built on moka's async LRU + TTL cache, owned per-dispatcher instance.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::telemetry;
use crate::types::RequestContext;

/// Configuration for the response cache.
///
/// ```rust
/// # use sleipnir::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A cached dispatch result: the text plus the backend that produced it.
#[derive(Debug, Clone)]
pub(crate) struct CachedAnswer {
    pub text: String,
    pub backend: Option<String>,
}

/// In-memory TTL cache of successful dispatch results.
pub struct ResponseCache {
    cache: Cache<u64, CachedAnswer>,
}

impl ResponseCache {
    /// Create a response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up a cached answer. Returns `None` when never set or when
    /// the TTL has elapsed. Emits cache hit/miss metrics.
    pub(crate) async fn get(&self, key: u64) -> Option<CachedAnswer> {
        match self.cache.get(&key).await {
            Some(answer) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(answer)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store a successful answer, unconditionally overwriting any
    /// previous entry for the key and restamping its TTL.
    pub(crate) async fn put(&self, key: u64, text: String, backend: Option<String>) {
        self.cache.insert(key, CachedAnswer { text, backend }).await;
    }
}

/// Compute the cache key for a request.
///
/// Hashes the normalised input text together with the explicit backend
/// override. The override's presence is hashed as a discriminant, so a
/// backend literally named like the absent marker cannot collide with
/// the "no override" key space.
///
/// Uses `DefaultHasher` (SipHash): deterministic within a process
/// lifetime, which is all an in-memory cache needs.
pub(crate) fn request_key(ctx: &RequestContext) -> u64 {
    let mut hasher = DefaultHasher::new();
    ctx.normalized_input().hash(&mut hasher);
    match ctx.explicit_backend() {
        Some(backend) => {
            1u8.hash(&mut hasher);
            backend.hash(&mut hasher);
        }
        None => 0u8.hash(&mut hasher),
    }
    hasher.finish()
}
