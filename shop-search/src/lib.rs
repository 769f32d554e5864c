//! # shop-search
//!
//! Product search across shopping sources with package-size normalisation.
//!
//! ## Design
//!
//! - Queries a structured source (SerpAPI Google Shopping) and a scraped
//!   source (the Google Shopping results page) concurrently
//! - Keeps the listings of the first source, in configured order, that found
//!   anything; other sources are fallbacks, not merged in
//! - Extracts a canonical package size (`"12 x 12 oz (144 oz)"`) from each
//!   listing's title or tags
//! - Caches aggregated results in memory with a per-entry TTL
//! - Graceful degradation: a failing source never fails the request while
//!   another source still answers
//!
//! ## Security
//!
//! - The SerpAPI key never appears in errors or logs
//! - Search queries are logged only at trace level

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod service;
pub mod source;
pub mod sources;
pub mod types;

pub use cache::{MokaSearchCache, SearchCache};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use normalize::{normalize, normalize_from_any};
pub use orchestrator::FetchOrchestrator;
pub use service::SearchService;
pub use source::SourceFetcher;
pub use sources::ConfiguredSource;
pub use types::{AggregateResult, Listing, SourceKind, SourceOutcome, SourceResult};

/// The service wired with the configured network sources and an in-memory cache.
pub type ProductSearch = SearchService<ConfiguredSource, MokaSearchCache>;

/// Build a [`ProductSearch`] from `config`.
///
/// Sources are created in `config.sources` order; SerpAPI is only included
/// when an API key is set.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the configuration is invalid or leaves
/// no usable source.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> shop_search::Result<()> {
/// let service = shop_search::build_service(&shop_search::SearchConfig::default())?;
/// let result = service.search("jasmine rice").await?;
/// for listing in &result.listings {
///     println!("{:?}: {:?}", listing.name, listing.quantity);
/// }
/// # Ok(())
/// # }
/// ```
pub fn build_service(config: &SearchConfig) -> Result<ProductSearch> {
    let sources = sources::build_sources(config)?;
    let cache = MokaSearchCache::new(config.cache_max_entries);
    SearchService::new(config, sources, cache)
}
