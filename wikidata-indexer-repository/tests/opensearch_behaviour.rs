//! Integration tests for the OpenSearch client against a mock server.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikidata_indexer_repository::{OpenSearchIndexClient, SearchIndexProvider};
use wikidata_indexer_shared::{BulkAction, NormalizedDocument};

fn client(server: &MockServer) -> OpenSearchIndexClient {
    OpenSearchIndexClient::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn ensure_index_creates_missing_index() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true, "index": "entities"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).ensure_index("entities").await.unwrap();
}

#[tokio::test]
async fn ensure_index_tolerates_existing_index() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [entities] already exists"
            },
            "status": 400
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);

    // Creating twice never errors.
    client.ensure_index("entities").await.unwrap();
    client.ensure_index("entities").await.unwrap();
}

#[tokio::test]
async fn ensure_index_surfaces_other_errors() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"type": "invalid_index_name_exception"},
            "status": 400
        })))
        .mount(&server)
        .await;

    let result = client(&server).ensure_index("entities").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn bulk_write_accounts_for_each_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entities/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 5,
            "errors": true,
            "items": [
                {"index": {"_id": "Q1", "status": 201}},
                {"index": {"_id": "Q2", "status": 400, "error": {"type": "mapper_parsing_exception", "reason": "bad field"}}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let actions = vec![
        BulkAction::try_from(NormalizedDocument::new("Q1")).unwrap(),
        BulkAction::try_from(NormalizedDocument::new("Q2")).unwrap(),
    ];

    let summary = client(&server)
        .bulk_write("entities", actions)
        .await
        .unwrap();

    assert_eq!(summary.successes, 1);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].id, "Q2");
    assert_eq!(
        summary.failed[0].body["error"]["reason"],
        "bad field"
    );
}

#[tokio::test]
async fn empty_bulk_is_a_no_op() {
    let server = MockServer::start().await;

    let summary = client(&server)
        .bulk_write("entities", Vec::new())
        .await
        .unwrap();

    assert_eq!(summary.total(), 0);
}
