//! Error types for the shop-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. API keys never appear in error messages.

/// Errors that can occur during a product search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query was missing or blank. Rejected before any cache or source access.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Every configured source failed to produce a response.
    #[error("all sources failed: {0}")]
    AllSourcesFailed(String),

    /// A single source exceeded its request deadline.
    #[error("source timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a source failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A source response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

/// Convenience type alias for shop-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
