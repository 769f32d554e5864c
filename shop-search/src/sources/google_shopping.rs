//! Google Shopping results page: scraped fallback when no API key is set
//! or the structured source has nothing.
//!
//! The page is parsed with CSS selectors on the product grid cards. Google
//! changes class names periodically, so an empty parse is reported as an
//! empty result rather than an error.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::{self, ClientProfile, UserAgent};
use crate::source::SourceFetcher;
use crate::types::{Listing, SourceKind};

use super::{clean_text, map_request_error};

/// Google Shopping HTML scraper.
pub struct GoogleShoppingSource {
    client: reqwest::Client,
    user_agent: UserAgent,
    endpoint: Url,
    max_results: usize,
}

impl GoogleShoppingSource {
    /// Create a scraping source using `config` for endpoint, timeout and limits.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the endpoint is not a valid URL, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&config.google_shopping_endpoint).map_err(|e| {
            SearchError::Config(format!("google_shopping_endpoint is not a valid URL: {e}"))
        })?;
        Ok(Self {
            client: http::build_client(config, ClientProfile::Browser)?,
            user_agent: UserAgent::from_config(config),
            endpoint,
            max_results: config.max_results,
        })
    }
}

impl SourceFetcher for GoogleShoppingSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SearchError> {
        tracing::trace!(query, "Google Shopping search");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("tbm", "shop"), ("q", query)])
            .header(reqwest::header::USER_AGENT, self.user_agent.pick())
            .send()
            .await
            .map_err(|e| map_request_error("Google Shopping request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Google Shopping HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| map_request_error("Google Shopping response read failed", e))?;

        tracing::trace!(bytes = html.len(), "Google Shopping response received");

        parse_shopping_html(&html, &self.endpoint, self.max_results)
    }

    fn name(&self) -> &str {
        SourceKind::GoogleShopping.name()
    }
}

/// Parse a Google Shopping results page into listings.
///
/// Relative links are resolved against `base`. Cards without a product name
/// are skipped.
pub(crate) fn parse_shopping_html(
    html: &str,
    base: &Url,
    max_results: usize,
) -> Result<Vec<Listing>, SearchError> {
    let document = Html::parse_document(html);

    let card_sel = selector("div.sh-dgr__grid-result")?;
    let name_sel = selector(".tAxDx")?;
    let price_sel = selector(".a8Pemb")?;
    let vendor_sel = selector(".aULzUe")?;
    let link_sel = selector("a[href]")?;

    let mut listings = Vec::new();

    for card in document.select(&card_sel) {
        let name = match first_text(card, &name_sel) {
            Some(n) => n,
            None => continue,
        };

        let link = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(base, href));

        listings.push(Listing {
            name: Some(name),
            price: first_text(card, &price_sel),
            vendor: first_text(card, &vendor_sel),
            link,
            quantity: None,
            tags: Vec::new(),
        });

        if listings.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = listings.len(), "Google Shopping listings parsed");
    Ok(listings)
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    card.select(sel)
        .next()
        .and_then(|el| clean_text(Some(el.text().collect::<String>())))
}

/// Resolve `href` against `base`, unwrapping Google's `/url?q=` redirect.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = base.join(href).ok()?;
    if resolved.path() == "/url" {
        let target = resolved
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned());
        if let Some(target) = target {
            return Url::parse(&target).ok().map(String::from);
        }
    }
    Some(resolved.into())
}
