//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which sources are queried and in what order,
//! request timeouts, caching, and request behaviour. It deserialises from
//! any serde format with every field optional.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;
use crate::types::SourceKind;

/// Default SerpAPI search endpoint.
pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Default Google Shopping results page.
pub const DEFAULT_GOOGLE_SHOPPING_ENDPOINT: &str = "https://www.google.com/search";

/// Configuration for product search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// SerpAPI key. When absent the SerpAPI source is skipped.
    pub api_key: Option<String>,
    /// Per-source request deadline in seconds.
    pub request_timeout_seconds: u64,
    /// How long aggregated results stay cached, in seconds.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached queries.
    pub cache_max_entries: u64,
    /// Sources in fallback precedence order.
    pub sources: Vec<SourceKind>,
    /// Maximum listings kept from a single source.
    pub max_results: usize,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// SerpAPI endpoint URL.
    pub serpapi_endpoint: String,
    /// Google Shopping results page URL.
    pub google_shopping_endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            request_timeout_seconds: 10,
            cache_ttl_seconds: 300,
            cache_max_entries: 1000,
            sources: vec![SourceKind::SerpApi, SourceKind::GoogleShopping],
            max_results: 40,
            user_agent: None,
            serpapi_endpoint: DEFAULT_SERPAPI_ENDPOINT.to_owned(),
            google_shopping_endpoint: DEFAULT_GOOGLE_SHOPPING_ENDPOINT.to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `request_timeout_seconds` must be greater than 0
    /// - `max_results` must be greater than 0
    /// - `cache_max_entries` must be greater than 0
    /// - `sources` must not be empty
    /// - both endpoints must be absolute URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.request_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(SearchError::Config(
                "cache_max_entries must be greater than 0".into(),
            ));
        }
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be enabled".into(),
            ));
        }
        for (field, value) in [
            ("serpapi_endpoint", &self.serpapi_endpoint),
            ("google_shopping_endpoint", &self.google_shopping_endpoint),
        ] {
            Url::parse(value)
                .map_err(|e| SearchError::Config(format!("{field} is not a valid URL: {e}")))?;
        }
        Ok(())
    }

    /// The API key with surrounding whitespace and quotes removed.
    ///
    /// Returns `None` when no key is set or the key is blank.
    pub fn effective_api_key(&self) -> Option<&str> {
        let key = self.api_key.as_deref()?.trim().trim_matches('"').trim();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.max_results, 40);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn default_sources_prefer_structured_api() {
        let config = SearchConfig::default();
        assert_eq!(
            config.sources,
            vec![SourceKind::SerpApi, SourceKind::GoogleShopping]
        );
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            request_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_seconds"));
    }

    #[test]
    fn zero_max_results_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn zero_cache_capacity_rejected() {
        let config = SearchConfig {
            cache_max_entries: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_max_entries"));
    }

    #[test]
    fn empty_sources_rejected() {
        let config = SearchConfig {
            sources: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("source"));
    }

    #[test]
    fn relative_endpoint_rejected() {
        let config = SearchConfig {
            serpapi_endpoint: "/search.json".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("serpapi_endpoint"));
    }

    #[test]
    fn zero_ttl_is_allowed() {
        let config = SearchConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_key_quotes_stripped() {
        let config = SearchConfig {
            api_key: Some("\"abc123\"".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_key(), Some("abc123"));
    }

    #[test]
    fn blank_api_key_treated_as_absent() {
        let config = SearchConfig {
            api_key: Some("  \"\" ".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_key(), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"request_timeout_seconds": 3, "sources": ["google_shopping"]}"#)
                .expect("deserialize");
        assert_eq!(config.request_timeout_seconds, 3);
        assert_eq!(config.sources, vec![SourceKind::GoogleShopping]);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.serpapi_endpoint, DEFAULT_SERPAPI_ENDPOINT);
    }
}
