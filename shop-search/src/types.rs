//! Core types for product listings, per-source outcomes and aggregated results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single product listing returned by a shopping source.
///
/// Every field is optional because sources frequently omit data. The
/// `quantity` field is filled in by [`crate::normalize`] after the
/// orchestrator selects a winning source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Product title as displayed by the source.
    pub name: Option<String>,
    /// Display price, kept verbatim (currency symbol included).
    pub price: Option<String>,
    /// Merchant or store name.
    pub vendor: Option<String>,
    /// Absolute URL to the product page.
    pub link: Option<String>,
    /// Canonical package size, e.g. `"12 x 12 oz (144 oz)"`.
    #[serde(alias = "weight")]
    pub quantity: Option<String>,
    /// Vendor-supplied descriptive tags (free shipping, sizes, etc.).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Listing {
    /// Candidate strings for quantity normalisation: the name first, then each tag.
    pub fn quantity_candidates(&self) -> impl Iterator<Item = Option<&str>> {
        std::iter::once(self.name.as_deref()).chain(self.tags.iter().map(|t| Some(t.as_str())))
    }
}

/// Shopping sources that shop-search knows how to query.
///
/// The order of sources in [`crate::SearchConfig::sources`] is the fallback
/// precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// SerpAPI Google Shopping JSON API. Requires an API key.
    #[serde(rename = "serpapi")]
    SerpApi,
    /// Google Shopping results page, scraped with CSS selectors.
    #[serde(rename = "google_shopping")]
    GoogleShopping,
}

impl SourceKind {
    /// Returns the stable identifier of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerpApi => "serpapi",
            Self::GoogleShopping => "google_shopping",
        }
    }

    /// Whether this source needs an API key to be usable.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::SerpApi)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single source invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source answered with at least one listing.
    Success,
    /// The source answered successfully but found nothing.
    Empty,
    /// The source errored or timed out.
    Failed(String),
}

impl SourceOutcome {
    /// Whether the source responded at all, with or without listings.
    pub fn responded(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// The outcome of one source invocation. Lives for a single request.
#[derive(Debug, Clone)]
pub struct SourceResult {
    /// Name of the source that produced this result.
    pub source: String,
    /// Listings in source order. Empty unless `outcome` is `Success`.
    pub listings: Vec<Listing>,
    /// How the invocation ended.
    pub outcome: SourceOutcome,
}

impl SourceResult {
    /// Classify a fetch result into a `SourceResult`.
    pub fn from_fetch(source: impl Into<String>, fetched: crate::Result<Vec<Listing>>) -> Self {
        let source = source.into();
        match fetched {
            Ok(listings) if listings.is_empty() => Self {
                source,
                listings,
                outcome: SourceOutcome::Empty,
            },
            Ok(listings) => Self {
                source,
                listings,
                outcome: SourceOutcome::Success,
            },
            Err(err) => Self {
                source,
                listings: Vec::new(),
                outcome: SourceOutcome::Failed(err.to_string()),
            },
        }
    }
}

/// The listings chosen for a query, as cached and returned to callers.
///
/// An empty `listings` vector is a valid result ("no products found") and is
/// cached like any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Listings from the winning source, in source order.
    pub listings: Vec<Listing>,
    /// Whether this result was served from the cache.
    pub served_from_cache: bool,
    /// Name of the source the listings came from. `None` when no source had listings.
    pub source: Option<String>,
}
