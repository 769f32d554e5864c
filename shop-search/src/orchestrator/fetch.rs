//! Concurrent multi-source fan-out with fixed-precedence fallback.
//!
//! Every source is queried at once and the orchestrator waits for all of
//! them. The winner is the first source, in configuration order, that
//! returned listings; completion order never matters.

use std::time::Duration;

use crate::error::SearchError;
use crate::normalize::normalize_from_any;
use crate::source::SourceFetcher;
use crate::types::{AggregateResult, Listing, SourceOutcome, SourceResult};

/// Runs shopping sources concurrently and applies the fallback policy.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    timeout: Duration,
}

impl FetchOrchestrator {
    /// Create an orchestrator that gives each source `timeout` to answer.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query every fetcher and return the listings of the winning source.
    ///
    /// # Pipeline
    ///
    /// 1. Fan out to all fetchers with [`futures::future::join_all`], each
    ///    under its own deadline
    /// 2. Classify each outcome as Success, Empty or Failed
    /// 3. Pick the first Success in `fetchers` order
    /// 4. Fill in missing quantities on the winning listings
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllSourcesFailed`] only if **every** fetcher
    /// failed (or none was given). Sources that answered with nothing yield
    /// an empty, successful result.
    pub async fn run<F: SourceFetcher>(
        &self,
        query: &str,
        fetchers: &[F],
    ) -> Result<AggregateResult, SearchError> {
        let results = self.collect(query, fetchers).await;
        select_winner(results)
    }

    /// Fan out to every fetcher and classify each outcome, in fetcher order.
    pub async fn collect<F: SourceFetcher>(&self, query: &str, fetchers: &[F]) -> Vec<SourceResult> {
        let futures = fetchers.iter().map(|fetcher| async move {
            let fetched = match tokio::time::timeout(self.timeout, fetcher.fetch(query)).await {
                Ok(result) => result,
                Err(_) => Err(SearchError::Timeout(format!(
                    "{} exceeded {}s",
                    fetcher.name(),
                    self.timeout.as_secs()
                ))),
            };
            SourceResult::from_fetch(fetcher.name(), fetched)
        });

        futures::future::join_all(futures).await
    }
}

/// Apply the precedence rule to per-source results given in configuration order.
///
/// # Errors
///
/// Returns [`SearchError::AllSourcesFailed`] when no source responded.
pub fn select_winner(results: Vec<SourceResult>) -> Result<AggregateResult, SearchError> {
    let mut failures: Vec<String> = Vec::new();
    let mut responded = false;

    for result in results {
        match result.outcome {
            SourceOutcome::Success => {
                tracing::debug!(
                    source = %result.source,
                    count = result.listings.len(),
                    "source selected"
                );
                let listings = result.listings.into_iter().map(with_quantity).collect();
                return Ok(AggregateResult {
                    listings,
                    served_from_cache: false,
                    source: Some(result.source),
                });
            }
            SourceOutcome::Empty => {
                tracing::debug!(source = %result.source, "source returned no listings; falling back");
                responded = true;
            }
            SourceOutcome::Failed(reason) => {
                tracing::warn!(source = %result.source, error = %reason, "source query failed");
                failures.push(format!("{}: {reason}", result.source));
            }
        }
    }

    if !responded {
        if failures.is_empty() {
            return Err(SearchError::AllSourcesFailed("no sources configured".into()));
        }
        return Err(SearchError::AllSourcesFailed(failures.join("; ")));
    }

    Ok(AggregateResult::default())
}

/// Populate `quantity` from the name and tags when the source left it unset.
fn with_quantity(mut listing: Listing) -> Listing {
    if listing.quantity.is_none() {
        listing.quantity = normalize_from_any(listing.quantity_candidates());
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str) -> Listing {
        Listing {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn result(source: &str, outcome: SourceOutcome, listings: Vec<Listing>) -> SourceResult {
        SourceResult {
            source: source.to_string(),
            listings,
            outcome,
        }
    }

    #[test]
    fn first_success_in_order_wins() {
        let results = vec![
            result("a", SourceOutcome::Failed("down".into()), vec![]),
            result("b", SourceOutcome::Success, vec![listing("B1")]),
            result("c", SourceOutcome::Success, vec![listing("C1"), listing("C2")]),
        ];
        let aggregate = select_winner(results).expect("should select");
        assert_eq!(aggregate.source.as_deref(), Some("b"));
        assert_eq!(aggregate.listings.len(), 1);
        assert_eq!(aggregate.listings[0].name.as_deref(), Some("B1"));
        assert!(!aggregate.served_from_cache);
    }

    #[test]
    fn empty_source_triggers_fallback() {
        let results = vec![
            result("a", SourceOutcome::Empty, vec![]),
            result("b", SourceOutcome::Success, vec![listing("B1")]),
        ];
        let aggregate = select_winner(results).expect("should select");
        assert_eq!(aggregate.source.as_deref(), Some("b"));
    }

    #[test]
    fn all_empty_is_empty_success() {
        let results = vec![
            result("a", SourceOutcome::Empty, vec![]),
            result("b", SourceOutcome::Empty, vec![]),
        ];
        let aggregate = select_winner(results).expect("should be ok");
        assert!(aggregate.listings.is_empty());
        assert!(aggregate.source.is_none());
    }

    #[test]
    fn one_empty_rest_failed_is_empty_success() {
        let results = vec![
            result("a", SourceOutcome::Failed("timeout".into()), vec![]),
            result("b", SourceOutcome::Empty, vec![]),
        ];
        assert!(select_winner(results).expect("should be ok").listings.is_empty());
    }

    #[test]
    fn all_failed_reports_every_source() {
        let results = vec![
            result("a", SourceOutcome::Failed("HTTP error: 503".into()), vec![]),
            result("b", SourceOutcome::Failed("parse error: bad html".into()), vec![]),
        ];
        let err = select_winner(results).unwrap_err();
        assert!(matches!(err, SearchError::AllSourcesFailed(_)));
        let msg = err.to_string();
        assert!(msg.contains("a: HTTP error: 503"));
        assert!(msg.contains("b: parse error: bad html"));
    }

    #[test]
    fn no_sources_is_failure() {
        let err = select_winner(vec![]).unwrap_err();
        assert!(err.to_string().contains("no sources configured"));
    }

    #[test]
    fn winner_quantities_are_normalised() {
        let mut tagged = listing("Premium Coffee");
        tagged.tags = vec!["Free shipping".into(), "12 oz".into()];
        let mut preset = listing("Tea 20 ct");
        preset.quantity = Some("20 bags".into());

        let results = vec![result(
            "a",
            SourceOutcome::Success,
            vec![listing("Cola 12 x 12 fl oz"), tagged, preset, listing("Mug")],
        )];
        let aggregate = select_winner(results).expect("should select");
        let quantities: Vec<_> = aggregate
            .listings
            .iter()
            .map(|l| l.quantity.as_deref())
            .collect();
        assert_eq!(
            quantities,
            vec![
                Some("12 x 12 fl oz (144 fl oz)"),
                Some("12 oz"),
                Some("20 bags"),
                None
            ]
        );
    }
}
