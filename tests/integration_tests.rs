//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: typed operation → reqwest transport →
//! HTTP request on the wire → typed response or error

use airtable_cdk::http::{ReqwestTransport, RetryPolicy};
use airtable_cdk::{
    Airtable, ClientConfig, ClientErrorKind, Credentials, Error, Executor, FieldValue,
    Parameters, Record, RecordFields, SortDirection,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: &str, name: &str) -> Value {
    json!({"id": id, "createdTime": "2024-01-01T00:00:00.000Z", "fields": {"Name": name}})
}

fn client(server: &MockServer) -> Airtable {
    let config = ClientConfig::builder()
        .api_key("test-key")
        .base("appTest")
        .api_url(format!("{}/v0", server.uri()))
        .retry_delay(Duration::from_millis(10))
        .build();
    Airtable::from_config(&config).unwrap()
}

// ============================================================================
// Requests on the Wire
// ============================================================================

#[tokio::test]
async fn test_list_sends_auth_and_encoded_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/My%20Table"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(query_param("fields[]", "Name"))
        .and(query_param("sort[0][field]", "Name"))
        .and(query_param("sort[0][direction]", "desc"))
        .and(query_param("pageSize", "2"))
        .and(query_param("filterByFormula", "{Done} = 1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record("rec1", "a"), record("rec2", "b")],
            "offset": "itr1/rec2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = Parameters::table("My Table")
        .field("Name")
        .sort_by("Name", SortDirection::Desc)
        .page_size(2)
        .filter_by_formula("{Done} = 1");
    let page = client(&server).list(&params).await.unwrap();

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[1].field("Name"), Some(&FieldValue::from("b")));
    assert!(page.has_more());
}

#[tokio::test]
async fn test_create_posts_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/appTest/Tasks"))
        .and(body_json(json!({"fields": {"Name": "New"}, "typecast": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("recNew", "New")))
        .expect(1)
        .mount(&server)
        .await;

    let body = RecordFields::default().field("Name", "New").typecast(true);
    let created: Record = client(&server)
        .create(&Parameters::table("Tasks"), &body)
        .await
        .unwrap();
    assert_eq!(created.id, "recNew");
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v0/appTest/Tasks/rec1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete(&Parameters::table("Tasks"), "rec1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_metadata_sends_client_secret() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/meta/bases"))
        .and(header("X-Airtable-Client-Secret", "shh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bases": [{"id": "appTest", "name": "Ops", "permissionLevel": "create"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = Executor::new(
        Arc::new(ReqwestTransport::new().unwrap()),
        Credentials::new("test-key").with_client_secret("shh"),
    )
    .with_api_url(format!("{}/v0", server.uri()));
    let client = Airtable::with_executor(executor, "appTest");

    let bases = client.list_bases().await.unwrap();
    assert_eq!(bases.bases[0].name, "Ops");
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_recovers_from_429() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/Tasks/rec1"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/Tasks/rec1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("rec1", "a")))
        .mount(&server)
        .await;

    let record = client(&server)
        .get(&Parameters::table("Tasks"), "rec1")
        .await
        .unwrap();
    assert_eq!(record.id, "rec1");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_gives_up_after_retry_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_key("test-key")
        .base("appTest")
        .api_url(format!("{}/v0", server.uri()))
        .build();
    let client = Airtable::from_config(&config).unwrap();
    let executor = client.executor().clone().with_retry(RetryPolicy {
        max_retries: 2,
        delay: Duration::from_millis(5),
    });
    let client = Airtable::with_executor(executor, "appTest");

    let err = client.list(&Parameters::table("Tasks")).await.unwrap_err();
    assert!(matches!(err, Error::RateLimitExceeded { retries: 2 }));
}

#[tokio::test]
async fn test_unprocessable_entity_diagnostic() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v0/appTest/Tasks/rec1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"message": "bad field", "type": "INVALID_VALUE"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .update::<_, Record>(&Parameters::table("Tasks"), "rec1", &json!({"fields": {}}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Client { kind: ClientErrorKind::InvalidRequest, .. }
    ));
    let text = err.to_string();
    assert!(text.contains("bad field"));
    assert!(text.contains("INVALID_VALUE"));
}

#[tokio::test]
async fn test_transport_failure_surfaces() {
    // nothing listens on port 1
    let config = ClientConfig::builder()
        .api_key("test-key")
        .base("appTest")
        .api_url("http://127.0.0.1:1/v0")
        .build();
    let err = Airtable::from_config(&config)
        .unwrap()
        .list(&Parameters::table("Tasks"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_pager_follows_cursor_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/Tasks"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record("rec1", "a"), record("rec2", "b")],
            "offset": "itr1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/Tasks"))
        .and(query_param("offset", "itr1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record("rec3", "c")],
            "offset": "itr2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0/appTest/Tasks"))
        .and(query_param("offset", "itr2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [record("rec4", "d")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut pager = client.pager(Parameters::table("Tasks").page_size(2));
    let mut ids = Vec::new();
    loop {
        match pager.next_page().await {
            Ok(records) => ids.extend(records.into_iter().map(|r| r.id)),
            Err(e) if e.is_end_of_list() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ids, ["rec1", "rec2", "rec3", "rec4"]);
    assert_eq!(pager.pages_fetched(), 3);
    assert!(pager.next_page().await.unwrap_err().is_end_of_list());
}
