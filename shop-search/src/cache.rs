//! Cache gateway for aggregated search results.
//!
//! [`SearchCache`] is the narrow get/set interface the service talks to.
//! [`MokaSearchCache`] is the in-process implementation: a bounded
//! [`moka`] cache whose entries each expire after the TTL given at insert.

use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;

use crate::types::AggregateResult;

/// Namespace prefix that keeps product searches apart from other cache users.
pub const CACHE_KEY_PREFIX: &str = "product_search:";

/// Build the cache key for a query: prefix plus the trimmed, lowercased query.
pub fn query_cache_key(query: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{}", query.trim().to_lowercase())
}

/// Key-value store with per-entry TTL.
///
/// Implementations must be safe to share between concurrent requests.
pub trait SearchCache: Send + Sync {
    /// Look up a cached result. Returns `None` on a miss or after expiry.
    fn get(&self, key: &str) -> impl std::future::Future<Output = Option<AggregateResult>> + Send;

    /// Store `value` under `key` for `ttl_seconds`.
    fn set(
        &self,
        key: &str,
        value: AggregateResult,
        ttl_seconds: u64,
    ) -> impl std::future::Future<Output = ()> + Send;
}

#[derive(Debug, Clone)]
struct CachedEntry {
    result: AggregateResult,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory cache backed by [`moka`].
#[derive(Clone)]
pub struct MokaSearchCache {
    inner: Cache<String, CachedEntry>,
}

impl MokaSearchCache {
    /// Create a cache holding at most `max_entries` queries.
    pub fn new(max_entries: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }
}

impl SearchCache for MokaSearchCache {
    async fn get(&self, key: &str) -> Option<AggregateResult> {
        self.inner.get(key).await.map(|entry| entry.result)
    }

    async fn set(&self, key: &str, value: AggregateResult, ttl_seconds: u64) {
        if ttl_seconds == 0 {
            return;
        }
        let entry = CachedEntry {
            result: value,
            ttl: Duration::from_secs(ttl_seconds),
        };
        self.inner.insert(key.to_owned(), entry).await;
    }
}
