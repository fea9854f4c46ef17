use std::sync::Arc;
use std::time::Duration;

use congress_api::{Error, HeaderMap, HttpClient, Method, RateLimiter};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client_for(server: &MockServer, limiter: Arc<RateLimiter>) -> HttpClient {
    let base_url = format!("{}/v3", server.uri());
    HttpClient::with_base_url(&base_url, "test-key".to_string(), limiter).unwrap()
}

#[tokio::test]
async fn get_sends_key_and_format() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("amendments.json");

    Mock::given(method("GET"))
        .and(path("/v3/amendment/118"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(RateLimiter::default()));
    let result = client
        .get("amendment/118", &[("limit".to_string(), "2".to_string())])
        .await
        .unwrap();

    assert_eq!(result["amendments"].as_array().unwrap().len(), 2);
    assert_eq!(client.limiter().status().requests_this_hour, 1);
}

#[tokio::test]
async fn execute_forwards_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/congress/current"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"congress": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-trace", "abc".parse().unwrap());

    let client = client_for(&mock_server, Arc::new(RateLimiter::default()));
    let result = client
        .execute(Method::GET, "congress/current", &[], headers)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn server_error_is_api_error_with_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/bill"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(RateLimiter::default()));
    let err = client.get("bill", &[]).await.unwrap_err();

    match &err {
        Error::Api { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn not_found_is_api_error_at_transport_level() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment/119/hamdt/99999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\": \"not found\"}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(RateLimiter::default()));
    let err = client.get("amendment/119/hamdt/99999", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(RateLimiter::default()));
    let err = client.get("bill", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn timeout_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/bill"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v3", mock_server.uri());
    let client = HttpClient::with_options(
        &base_url,
        "test-key".to_string(),
        Arc::new(RateLimiter::default()),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = client.get("bill", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Transient(_)));
    assert!(err.is_retryable());
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn exhausted_budget_sends_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(RateLimiter::new(2)));
    client.get("bill", &[]).await.unwrap();
    client.get("bill", &[]).await.unwrap();

    let err = client.get("bill", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::RateLimitExceeded { count: 2, limit: 2 }
    ));
    assert!(!err.is_retryable());
    // MockServer verifies `expect(2)` on drop.
}

#[tokio::test]
async fn failed_requests_still_consume_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let limiter = Arc::new(RateLimiter::new(5));
    let client = client_for(&mock_server, Arc::clone(&limiter));
    assert!(client.get("bill", &[]).await.is_err());
    assert_eq!(limiter.status().requests_this_hour, 1);
}

#[tokio::test]
async fn invalid_base_url_spends_no_budget() {
    let limiter = Arc::new(RateLimiter::new(5));
    let client =
        HttpClient::with_base_url("not a url", "test-key".to_string(), Arc::clone(&limiter))
            .unwrap();

    let err = client.get("bill", &[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(!err.is_retryable());
    assert_eq!(limiter.status().requests_this_hour, 0);
}
