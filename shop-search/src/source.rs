//! Trait definition for pluggable shopping sources.
//!
//! Each source (SerpAPI, the Google Shopping results page) implements
//! [`SourceFetcher`] to provide a uniform interface for querying and
//! parsing listings.

use crate::error::SearchError;
use crate::types::Listing;

/// A pluggable shopping source.
///
/// Implementors query one upstream and extract [`Listing`] values. Each
/// source handles its own:
///
/// - URL construction with query encoding
/// - HTTP request with appropriate headers and a bounded timeout
/// - response parsing (JSON or CSS selectors)
/// - mapping transport and parse failures to [`SearchError`]
///
/// All implementations must be `Send + Sync` so the orchestrator can query
/// them concurrently.
pub trait SourceFetcher: Send + Sync {
    /// Fetch listings for `query`.
    ///
    /// Listings may leave `quantity` unset; the orchestrator fills it in.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the upstream returns a
    /// non-success status, or the response cannot be parsed.
    fn fetch(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Listing>, SearchError>> + Send;

    /// Stable identifier used in logs and error messages.
    fn name(&self) -> &str;
}
