//! End-to-end tests for the HTTP boundary.
//!
//! Each test serves the router on an ephemeral port with both shopping
//! sources pointed at local wiremock servers.

use std::sync::Arc;

use shop_search::{SearchConfig, SourceKind};
use shopapi::SearchResponse;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERPAPI_JSON: &str = r#"{
  "shopping_results": [
    {
      "title": "Coca-Cola Soda 12 x 12 fl oz Cans",
      "link": "https://www.walmart.com/ip/10535087",
      "source": "Walmart",
      "price": "$7.48"
    }
  ]
}"#;

struct Harness {
    base: String,
    client: reqwest::Client,
    _api: MockServer,
    _page: MockServer,
}

async fn start(api: MockServer, page: MockServer) -> Harness {
    let config = SearchConfig {
        api_key: Some("test-key".into()),
        sources: vec![SourceKind::SerpApi, SourceKind::GoogleShopping],
        serpapi_endpoint: format!("{}/search.json", api.uri()),
        google_shopping_endpoint: format!("{}/search", page.uri()),
        user_agent: Some("TestBot/1.0".into()),
        request_timeout_seconds: 5,
        ..Default::default()
    };
    let search = shop_search::build_service(&config).expect("should build");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(shopapi::serve(listener, Arc::new(search)));

    Harness {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        _api: api,
        _page: page,
    }
}

async fn empty_page() -> MockServer {
    let page = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&page)
        .await;
    page
}

#[tokio::test]
async fn health_reports_ok() {
    let h = start(MockServer::start().await, MockServer::start().await).await;

    let resp = h
        .client
        .get(format!("{}/health", h.base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn missing_or_blank_query_is_bad_request() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERPAPI_JSON))
        .expect(0)
        .mount(&api)
        .await;
    let h = start(api, MockServer::start().await).await;

    for url in [
        format!("{}/search", h.base),
        format!("{}/search?q=", h.base),
        format!("{}/search?q=%20%20", h.base),
    ] {
        let resp = h.client.get(&url).send().await.expect("request");
        assert_eq!(resp.status(), 400, "{url}");
        let body: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(body["error"], "query param 'q' is required");
    }
}

#[tokio::test]
async fn unparseable_query_string_is_json_bad_request() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERPAPI_JSON))
        .expect(0)
        .mount(&api)
        .await;
    let h = start(api, MockServer::start().await).await;

    let resp = h
        .client
        .get(format!("{}/search?q=rice&q=beans", h.base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("json body");
    let message = body["error"].as_str().expect("error string");
    assert!(message.starts_with("invalid query string"), "{message}");
}

#[tokio::test]
async fn search_returns_normalised_results_then_serves_cache() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_shopping"))
        .and(query_param("q", "Coca Cola"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERPAPI_JSON))
        .expect(1)
        .mount(&api)
        .await;
    let h = start(api, empty_page().await).await;

    let first: SearchResponse = h
        .client
        .get(format!("{}/search", h.base))
        .query(&[("q", "  Coca Cola ")])
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(first.query, "Coca Cola");
    assert!(!first.cached);
    assert_eq!(first.results.len(), 1);
    assert_eq!(first.results[0].vendor.as_deref(), Some("Walmart"));
    assert_eq!(
        first.results[0].quantity.as_deref(),
        Some("12 x 12 fl oz (144 fl oz)")
    );

    let second: SearchResponse = h
        .client
        .get(format!("{}/search", h.base))
        .query(&[("q", "coca cola")])
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(second.query, "coca cola");
    assert!(second.cached);
    assert_eq!(second.results, first.results);
}

#[tokio::test]
async fn all_sources_failing_is_bad_gateway() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;
    let page = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&page)
        .await;
    let h = start(api, page).await;

    let resp = h
        .client
        .get(format!("{}/search?q=rice", h.base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 502);
    let body: serde_json::Value = resp.json().await.expect("json");
    let message = body["error"].as_str().expect("error string");
    assert!(message.starts_with("all sources failed"));
    assert!(!message.contains("test-key"));
}

#[tokio::test]
async fn empty_results_are_ok() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error": "Google hasn't returned any results for this query."}"#),
        )
        .mount(&api)
        .await;
    let h = start(api, empty_page().await).await;

    let resp: SearchResponse = h
        .client
        .get(format!("{}/search?q=unobtainium", h.base))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert!(!resp.cached);
    assert!(resp.results.is_empty());
}
