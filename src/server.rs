//! HTTP boundary for product search.
//!
//! `GET /search?q=<text>` answers with `{query, cached, results}`;
//! `GET /health` answers `{"status": "ok"}`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shop_search::{Listing, ProductSearch, SearchError};
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    search: Arc<ProductSearch>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Successful `/search` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received, trimmed.
    pub query: String,
    /// Whether the results came from the cache.
    pub cached: bool,
    /// Listings from the winning source, with package sizes filled in.
    pub results: Vec<Listing>,
}

/// Build the router over a shared search service.
pub fn router(search: Arc<ProductSearch>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search_products))
        .with_state(AppState { search })
}

/// Serve the API on an already-bound listener until the server stops.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: tokio::net::TcpListener, search: Arc<ProductSearch>) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    tracing::info!("product search API listening on http://{local_addr}");
    axum::serve(listener, router(search)).await?;
    Ok(())
}

/// Bind `addr` and serve the API.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(addr: &str, search: Arc<ProductSearch>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, search).await
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> axum::response::Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return bad_request(&format!("invalid query string: {}", rejection.body_text()));
        }
    };
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return bad_request("query param 'q' is required");
    }

    match state.search.search(query).await {
        Ok(result) => Json(SearchResponse {
            query: query.to_owned(),
            cached: result.served_from_cache,
            results: result.listings,
        })
        .into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, "product search failed");
            }
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

fn status_for(error: &SearchError) -> StatusCode {
    match error {
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        SearchError::AllSourcesFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            status_for(&SearchError::InvalidQuery("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SearchError::AllSourcesFailed("a: down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&SearchError::Config("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_shape() {
        let body = SearchResponse {
            query: "Rice".into(),
            cached: true,
            results: vec![],
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"query": "Rice", "cached": true, "results": []})
        );
    }
}
