use std::sync::Arc;

use chrono::NaiveDate;
use congress_lib::congress_api::HttpClient;
use congress_lib::types::AmendmentType;
use congress_lib::{
    AmendmentService, GatewayError, ListQuery, Query, RateLimiter, ResourceService,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn service_for(server: &MockServer) -> AmendmentService {
    let base_url = format!("{}/v3", server.uri());
    let client = HttpClient::with_base_url(
        &base_url,
        "test-key".to_string(),
        Arc::new(RateLimiter::default()),
    )
    .unwrap();
    AmendmentService::new(ResourceService::new(Arc::new(client)))
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn generated_page(count: usize) -> Value {
    let amendments: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "congress": 118,
                "number": n.to_string(),
                "type": "HAMDT",
                "description": format!("Medicare amendment {}", n)
            })
        })
        .collect();
    json!({ "amendments": amendments, "pagination": { "count": count } })
}

#[tokio::test]
async fn list_drops_malformed_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment/118/hamdt"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amendments": [
                {"congress": 118, "number": "852", "type": "HAMDT"},
                {"congress": 118, "type": "HAMDT", "description": "missing number"}
            ],
            "pagination": {"count": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let page = service
        .list(
            Some(118),
            Some(AmendmentType::Hamdt),
            ListQuery::default().with_limit(20),
        )
        .await
        .unwrap();

    assert_eq!(page.amendments.len(), 1);
    assert_eq!(page.amendments[0].number, 852);
    assert_eq!(page.dropped, 1);
}

#[tokio::test]
async fn list_without_filters_hits_collection_root() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("amendments_page.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let page = service.list(None, None, ListQuery::default()).await.unwrap();

    assert_eq!(page.amendments.len(), 4);
    assert_eq!(page.dropped, 1);
    assert_eq!(page.pagination.as_ref().unwrap().count, 4521);
}

#[tokio::test]
async fn type_without_congress_is_rejected() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let err = service
        .list(None, Some(AmendmentType::Samdt), ListQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidInput(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn body_without_amendments_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment/118"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bills": []})))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let err = service
        .list(Some(118), None, ListQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Parse(_)));
}

#[tokio::test]
async fn get_returns_typed_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment/117/samdt/2137"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("amendment_detail.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let detail = service.get(117, AmendmentType::Samdt, 2137).await.unwrap();

    assert_eq!(detail.amendment.number, 2137);
    assert_eq!(detail.amendment.congress, 117);
    assert_eq!(detail.amendment.amendment_type, AmendmentType::Samdt);
    assert!(detail.amendment.is_sponsored_by("S001191"));
}

#[tokio::test]
async fn get_missing_amendment_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/amendment/119/hamdt/99999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let err = service
        .get(119, AmendmentType::Hamdt, 99999)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[tokio::test]
async fn search_matches_description_or_purpose() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/v3/amendment/118", load_fixture("amendments_page.json")).await;

    let service = service_for(&mock_server);
    let page = service
        .search_by_text("Medicare", Some(118), None)
        .await
        .unwrap();

    let numbers: Vec<u32> = page.amendments.iter().map(|a| a.number).collect();
    // 852 matches on description, 1610 on purpose; 611 and 1702 match neither.
    assert_eq!(numbers, vec![852, 1610]);
    assert_eq!(page.dropped, 1);
}

#[tokio::test]
async fn search_caps_results_and_keeps_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/v3/amendment", generated_page(120).to_string()).await;

    let service = service_for(&mock_server);
    let page = service.search_by_text("medicare", None, None).await.unwrap();

    assert_eq!(page.amendments.len(), 50);
    let numbers: Vec<u32> = page.amendments.iter().map(|a| a.number).collect();
    assert_eq!(numbers, (1..=50).collect::<Vec<u32>>());
}

#[tokio::test]
async fn search_limit_below_cap() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/v3/amendment", generated_page(30).to_string()).await;

    let service = service_for(&mock_server);
    let page = service
        .search_by_text("MEDICARE", None, Some(5))
        .await
        .unwrap();

    assert_eq!(page.amendments.len(), 5);
}

#[tokio::test]
async fn by_sponsor_filters_one_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/v3/amendment/118", load_fixture("amendments_page.json")).await;

    let service = service_for(&mock_server);
    let page = service.by_sponsor("s001191", Some(118), None).await.unwrap();

    let numbers: Vec<u32> = page.amendments.iter().map(|a| a.number).collect();
    assert_eq!(numbers, vec![1610, 1702]);
}

#[tokio::test]
async fn recent_skips_unparseable_dates() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/v3/amendment/118", load_fixture("amendments_page.json")).await;

    let service = service_for(&mock_server);
    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let page = service
        .recent_since(Some(118), cutoff, Some(10))
        .await
        .unwrap();

    let numbers: Vec<u32> = page.amendments.iter().map(|a| a.number).collect();
    assert_eq!(numbers, vec![852, 1610]);
}
