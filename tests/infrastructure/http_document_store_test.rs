use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use assistant_store::application::ports::{DocumentStore, DocumentStoreError};
use assistant_store::infrastructure::documents::HttpDocumentStore;

use crate::helpers::spawn_server;

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Value, Option<String>)>>>,
}

async fn data_api(
    State(recorded): State<Recorded>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    recorded
        .calls
        .lock()
        .await
        .push((action.clone(), body, api_key));

    match action.as_str() {
        "find" => (
            StatusCode::OK,
            Json(json!({ "documents": [{ "_id": { "$oid": "abc" }, "id": "1" }] })),
        ),
        "insertOne" => (StatusCode::OK, Json(json!({ "insertedId": { "$oid": "def" } }))),
        "updateOne" => (
            StatusCode::OK,
            Json(json!({ "matchedCount": 1, "modifiedCount": 1 })),
        ),
        "deleteOne" => (StatusCode::OK, Json(json!({ "deletedCount": 0 }))),
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "unknown action" }))),
    }
}

async fn start_data_api() -> (String, Recorded) {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/app/data/v1/action/{action}", post(data_api))
        .with_state(recorded.clone());
    let addr = spawn_server(router).await;
    (format!("http://{}/app/data/v1/", addr), recorded)
}

#[tokio::test]
async fn given_configured_store_when_finding_then_posts_collection_and_filter() {
    let (endpoint, recorded) = start_data_api().await;
    let store = HttpDocumentStore::new(
        reqwest::Client::new(),
        Some(&endpoint),
        Some("prompts_db"),
        Some("prompts"),
    )
    .with_data_source(Some("Cluster0"))
    .with_api_key(Some("data-key".to_string()));

    let documents = store.find(json!({ "assistant": "IT Support" })).await.unwrap();

    assert_eq!(documents.len(), 1);
    let calls = recorded.calls.lock().await;
    let (action, body, api_key) = &calls[0];
    assert_eq!(action, "find");
    assert_eq!(body["dataSource"], "Cluster0");
    assert_eq!(body["database"], "prompts_db");
    assert_eq!(body["collection"], "prompts");
    assert_eq!(body["filter"], json!({ "assistant": "IT Support" }));
    assert_eq!(api_key.as_deref(), Some("data-key"));
}

#[tokio::test]
async fn given_configured_store_when_writing_then_results_are_decoded() {
    let (endpoint, recorded) = start_data_api().await;
    let store = HttpDocumentStore::new(
        reqwest::Client::new(),
        Some(&endpoint),
        Some("prompts_db"),
        Some("prompts"),
    );

    let inserted = store.insert_one(json!({ "id": "custom_1" })).await.unwrap();
    let mut fields = Map::new();
    fields.insert("title".to_string(), json!("New"));
    let matched = store.update_one(json!({ "id": "custom_1" }), fields).await.unwrap();
    let deleted = store.delete_one(json!({ "id": "custom_1" })).await.unwrap();

    assert_eq!(inserted.as_deref(), Some("def"));
    assert_eq!(matched, 1);
    assert_eq!(deleted, 0);
    let calls = recorded.calls.lock().await;
    assert_eq!(calls[1].1["update"], json!({ "$set": { "title": "New" } }));
    assert!(calls[1].1.get("dataSource").is_none());
    assert_eq!(calls[1].2, None);
}

#[tokio::test]
async fn given_missing_collection_when_calling_then_not_configured_without_request() {
    let store = HttpDocumentStore::new(
        reqwest::Client::new(),
        Some("http://127.0.0.1:9"),
        Some("prompts_db"),
        None,
    );

    let result = store.find(json!({})).await;

    assert!(matches!(result, Err(DocumentStoreError::NotConfigured)));
}

#[tokio::test]
async fn given_server_error_when_calling_then_upstream_error_carries_status() {
    let router = Router::new().route(
        "/action/{action}",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid session") }),
    );
    let addr = spawn_server(router).await;
    let store = HttpDocumentStore::new(
        reqwest::Client::new(),
        Some(&format!("http://{}", addr)),
        Some("db"),
        Some("c"),
    );

    let result = store.delete_one(json!({ "id": "1" })).await;

    match result {
        Err(DocumentStoreError::Upstream { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid session");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}
