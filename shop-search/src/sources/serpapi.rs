//! SerpAPI Google Shopping source: structured JSON, needs an API key.
//!
//! Preferred over scraping: the response shape is stable and carries
//! vendor `extensions` that often spell out the package size.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::{self, ClientProfile};
use crate::source::SourceFetcher;
use crate::types::{Listing, SourceKind};

use super::{clean_text, map_request_error};

/// SerpAPI reports a query with no hits as an error string on a 200 response.
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

/// SerpAPI Google Shopping client.
pub struct SerpApiSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
}

impl SerpApiSource {
    /// Create a SerpAPI source using `config` for endpoint, timeout and limits.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig, api_key: &str) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config, ClientProfile::Api)?,
            endpoint: config.serpapi_endpoint.clone(),
            api_key: api_key.to_owned(),
            max_results: config.max_results,
        })
    }
}

impl SourceFetcher for SerpApiSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SearchError> {
        tracing::trace!(query, "SerpAPI search");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google_shopping"),
                ("q", query),
                ("hl", "en"),
                ("gl", "us"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| map_request_error("SerpAPI request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("SerpAPI HTTP error: {}", e.without_url())))?;

        let body = response
            .text()
            .await
            .map_err(|e| map_request_error("SerpAPI response read failed", e))?;

        tracing::trace!(bytes = body.len(), "SerpAPI response received");

        parse_serpapi_json(&body, self.max_results)
    }

    fn name(&self) -> &str {
        SourceKind::SerpApi.name()
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    shopping_results: Vec<SerpApiItem>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiItem {
    title: Option<String>,
    price: Option<String>,
    source: Option<String>,
    link: Option<String>,
    product_link: Option<String>,
    #[serde(default)]
    extensions: Vec<String>,
}

impl From<SerpApiItem> for Listing {
    fn from(item: SerpApiItem) -> Self {
        Listing {
            name: clean_text(item.title),
            price: clean_text(item.price),
            vendor: clean_text(item.source),
            link: clean_text(item.link).or_else(|| clean_text(item.product_link)),
            quantity: None,
            tags: item
                .extensions
                .into_iter()
                .filter_map(|t| clean_text(Some(t)))
                .collect(),
        }
    }
}

/// Parse a SerpAPI JSON body into listings.
///
/// Extracted as a separate function for testability with canned bodies.
pub(crate) fn parse_serpapi_json(body: &str, max_results: usize) -> Result<Vec<Listing>, SearchError> {
    let parsed: SerpApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid SerpAPI response: {e}")))?;

    if let Some(message) = parsed.error {
        if message.contains(NO_RESULTS_MARKER) {
            tracing::debug!("SerpAPI reported no results");
            return Ok(Vec::new());
        }
        return Err(SearchError::Http(format!("SerpAPI error: {message}")));
    }

    let listings: Vec<Listing> = parsed
        .shopping_results
        .into_iter()
        .take(max_results)
        .map(Listing::from)
        .collect();

    tracing::debug!(count = listings.len(), "SerpAPI listings parsed");
    Ok(listings)
}
