//! Cache-aside product search service.
//!
//! [`SearchService`] validates the query, consults the cache, runs the
//! orchestrator on a miss, and writes successful results back.

use std::time::Duration;

use crate::cache::{query_cache_key, SearchCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::orchestrator::FetchOrchestrator;
use crate::source::SourceFetcher;
use crate::types::AggregateResult;

/// Top-level product search entry point.
///
/// Generic over the source and cache implementations so tests can supply
/// in-process doubles. Production code uses
/// [`crate::sources::ConfiguredSource`] and [`crate::cache::MokaSearchCache`].
pub struct SearchService<F, C> {
    fetchers: Vec<F>,
    cache: C,
    orchestrator: FetchOrchestrator,
    cache_ttl_seconds: u64,
}

impl<F, C> SearchService<F, C>
where
    F: SourceFetcher,
    C: SearchCache,
{
    /// Build a service over `fetchers` (in precedence order) and `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: &SearchConfig, fetchers: Vec<F>, cache: C) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            fetchers,
            cache,
            orchestrator: FetchOrchestrator::new(Duration::from_secs(
                config.request_timeout_seconds,
            )),
            cache_ttl_seconds: config.cache_ttl_seconds,
        })
    }

    /// Search for products matching `query`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidQuery`] if `query` is blank; nothing is fetched.
    /// - [`SearchError::AllSourcesFailed`] if every source failed; nothing is cached.
    pub async fn search(&self, query: &str) -> Result<AggregateResult, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery("query must not be empty".into()));
        }

        let key = query_cache_key(trimmed);
        if let Some(mut cached) = self.cache.get(&key).await {
            tracing::debug!(count = cached.listings.len(), "cache hit");
            cached.served_from_cache = true;
            return Ok(cached);
        }

        tracing::trace!(query = trimmed, "cache miss; querying sources");
        let mut result = self.orchestrator.run(trimmed, &self.fetchers).await?;
        result.served_from_cache = false;

        self.cache
            .set(&key, result.clone(), self.cache_ttl_seconds)
            .await;

        Ok(result)
    }

    /// The configured sources, in precedence order.
    pub fn fetchers(&self) -> &[F] {
        &self.fetchers
    }
}
