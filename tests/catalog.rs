//! Integration tests for `RapidApiCatalog` using wiremock HTTP mocks.

use promo_sniper::catalog::{CatalogSearch, RapidApiCatalog};
use promo_sniper::model::SearchError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RapidApiCatalog {
    RapidApiCatalog::with_base_url("test-key", "provider.test", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_sends_auth_headers_and_returns_provider_json() {
    let server = MockServer::start().await;

    let body = json!({
        "products": [
            {"title": "Disk X", "price": "199.90", "link": "http://x"}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "ssd"))
        .and(query_param("country", "US"))
        .and(query_param("page", "1"))
        .and(header("x-rapidapi-key", "test-key"))
        .and(header("x-rapidapi-host", "provider.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.search("ssd", "US", 1).await.expect("search should succeed");

    assert_eq!(response, body);
}

#[tokio::test]
async fn non_2xx_status_is_a_failure_not_a_panic() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("ssd", "US", 1).await.unwrap_err();

    assert!(matches!(err, SearchError::Status(500)));
}

#[tokio::test]
async fn non_json_body_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("ssd", "US", 1).await.unwrap_err();

    assert!(matches!(err, SearchError::Http(_)));
}
