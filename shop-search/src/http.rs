//! HTTP clients for the shopping sources.
//!
//! The two sources want different things from a client. SerpAPI is a JSON
//! API keyed by `api_key`, so it gets a plain client that identifies this
//! crate. The results page is served differently to non-browsers, so the
//! scraped source gets a cookie jar, HTML `Accept` headers, and a browser
//! User-Agent picked on every request.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Desktop browsers that receive the grid layout of the results page.
const BROWSER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/134.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:136.0) Gecko/20100101 Firefox/136.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
];

const API_AGENT: &str = concat!("shop-search/", env!("CARGO_PKG_VERSION"));

/// How a source presents itself over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientProfile {
    /// JSON API: no cookies, fixed crate User-Agent.
    Api,
    /// Scraped HTML page: cookies, browser headers, User-Agent per request.
    Browser,
}

/// User-Agent policy for browser-profile requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgent {
    /// Always send this value (`config.user_agent`).
    Fixed(String),
    /// Pick one of the built-in browser strings on each request.
    Rotating,
}

impl UserAgent {
    pub fn from_config(config: &SearchConfig) -> Self {
        match config.user_agent.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => Self::Fixed(custom.to_owned()),
            _ => Self::Rotating,
        }
    }

    /// The value to send with the next request.
    pub fn pick(&self) -> &str {
        match self {
            Self::Fixed(ua) => ua,
            Self::Rotating => random_browser_agent(),
        }
    }
}

/// Build the client for `profile`.
///
/// Both profiles share the request timeout and redirect cap. A configured
/// `user_agent` replaces the API agent; browser-profile requests set their
/// own User-Agent header via [`UserAgent::pick`].
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(
    config: &SearchConfig,
    profile: ClientProfile,
) -> Result<reqwest::Client, SearchError> {
    let builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(5));

    let builder = match profile {
        ClientProfile::Api => {
            let agent = match UserAgent::from_config(config) {
                UserAgent::Fixed(custom) => custom,
                UserAgent::Rotating => API_AGENT.to_owned(),
            };
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
            builder.user_agent(agent).default_headers(headers)
        }
        ClientProfile::Browser => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::ACCEPT,
                HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
            );
            headers.insert(
                header::ACCEPT_LANGUAGE,
                HeaderValue::from_static("en-US,en;q=0.9"),
            );
            builder.cookie_store(true).default_headers(headers)
        }
    };

    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

fn random_browser_agent() -> &'static str {
    BROWSER_AGENTS[rand::thread_rng().gen_range(0..BROWSER_AGENTS.len())]
}
