//! Shopping source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceFetcher`].
//! [`build_sources`] turns a [`SearchConfig`] into the ordered list the
//! orchestrator consults.

pub mod google_shopping;
pub mod serpapi;

pub use google_shopping::GoogleShoppingSource;
pub use serpapi::SerpApiSource;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::source::SourceFetcher;
use crate::types::{Listing, SourceKind};

/// A concrete source selected by configuration.
pub enum ConfiguredSource {
    SerpApi(SerpApiSource),
    GoogleShopping(GoogleShoppingSource),
}

impl ConfiguredSource {
    /// Which [`SourceKind`] this source implements.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::SerpApi(_) => SourceKind::SerpApi,
            Self::GoogleShopping(_) => SourceKind::GoogleShopping,
        }
    }
}

impl SourceFetcher for ConfiguredSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SearchError> {
        match self {
            Self::SerpApi(source) => source.fetch(query).await,
            Self::GoogleShopping(source) => source.fetch(query).await,
        }
    }

    fn name(&self) -> &str {
        self.kind().name()
    }
}

/// Build the sources listed in `config.sources`, preserving their order.
///
/// SerpAPI is skipped when no API key is configured. Repeated kinds are
/// only built once, at their first position.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the configuration is invalid or no
/// listed source is usable.
pub fn build_sources(config: &SearchConfig) -> Result<Vec<ConfiguredSource>, SearchError> {
    config.validate()?;

    let mut seen: Vec<SourceKind> = Vec::with_capacity(config.sources.len());
    let mut sources = Vec::with_capacity(config.sources.len());

    for kind in &config.sources {
        if seen.contains(kind) {
            tracing::warn!(source = %kind, "source listed more than once; keeping first position");
            continue;
        }
        seen.push(*kind);

        match kind {
            SourceKind::SerpApi => match config.effective_api_key() {
                Some(key) => sources.push(ConfiguredSource::SerpApi(SerpApiSource::new(config, key)?)),
                None => tracing::debug!("no SerpAPI key configured; skipping serpapi source"),
            },
            SourceKind::GoogleShopping => {
                sources.push(ConfiguredSource::GoogleShopping(GoogleShoppingSource::new(config)?));
            }
        }
    }

    if sources.is_empty() {
        return Err(SearchError::Config(
            "no usable source: serpapi requires api_key".into(),
        ));
    }

    Ok(sources)
}

/// Trim and collapse whitespace; blank text becomes `None`.
pub(crate) fn clean_text(text: Option<String>) -> Option<String> {
    let text = text?;
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Map a transport error, keeping timeouts distinct and URLs (which may
/// carry the API key) out of the message.
pub(crate) fn map_request_error(context: &str, err: reqwest::Error) -> SearchError {
    let err = err.without_url();
    if err.is_timeout() {
        SearchError::Timeout(format!("{context}: {err}"))
    } else {
        SearchError::Http(format!("{context}: {err}"))
    }
}
