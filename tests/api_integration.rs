//! End-to-end tests driving the router in-process against a temporary
//! storage root.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use doc_store::api::{create_router, AppState};
use doc_store::infrastructure::preload::{PreloadEntry, Preloader};
use doc_store::infrastructure::{AppConfig, FsDocumentRepository, InMemoryDocumentRepository};

fn test_config(root: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.root = root.to_path_buf();
    config.server.response_delay = Duration::ZERO;
    config
}

async fn test_app(root: &std::path::Path) -> axum::Router {
    let repository = FsDocumentRepository::open(root).await.unwrap();
    create_router(AppState::new(Arc::new(repository), test_config(root)))
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn upload(app: &axum::Router, content: &[u8], filename: Option<&str>) -> String {
    let (status, body) = post_json(
        app,
        "/upload",
        json!({ "content": STANDARD.encode(content), "filename": filename }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["document_link_id"].as_str().unwrap().to_string()
}

// -- Health --------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_readiness_follows_storage_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("documents");
    let app = test_app(&root).await;

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "available");

    std::fs::remove_dir_all(&root).unwrap();
    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
}

// -- Upload / fetch ------------------------------------------------------------

#[tokio::test]
async fn test_hello_world_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let id = upload(&app, b"hello world", Some("greeting.txt")).await;
    assert_eq!(id.len(), 10);
    assert!(id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));

    let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        STANDARD.decode(body["content"].as_str().unwrap()).unwrap(),
        b"hello world"
    );
    assert_eq!(body["filename"], "greeting.txt");
}

#[tokio::test]
async fn test_binary_round_trip_without_filename() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;
    let content: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();

    let id = upload(&app, &content, None).await;
    let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        STANDARD.decode(body["content"].as_str().unwrap()).unwrap(),
        content
    );
    assert!(body["filename"].is_null());
}

#[tokio::test]
async fn test_empty_content_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let id = upload(&app, b"", Some("empty.txt")).await;
    let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "");
    assert_eq!(body["filename"], "empty.txt");
}

#[tokio::test]
async fn test_invalid_base64_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let (status, body) = post_json(
        &app,
        "/upload",
        json!({ "content": "%%% not base64 %%%", "filename": "x.txt" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_line_wrapped_base64_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    for content in ["aGVs\nbG8gd29ybGQ=", "aGVsbG8gd29ybGQ=\n"] {
        let (status, body) = post_json(&app, "/upload", json!({ "content": content })).await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let id = body["document_link_id"].as_str().unwrap();
        let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "aGVsbG8gd29ybGQ=");
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let (status, body) = post_json(&app, "/upload", json!({ "filename": "x.txt" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let (status, _) = post_json(&app, "/fetch", json!({ "id": "abc" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    for id in ["zzzzzzzzzz", "../../etc/passwd", ""] {
        let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{id:?}");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_fetch_by_uppercased_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("abcdefghij"), b"case matters").unwrap();
    let app = test_app(dir.path()).await;

    let (status, _) = post_json(&app, "/fetch", json!({ "document_link_id": "abcdefghij" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        post_json(&app, "/fetch", json!({ "document_link_id": "ABCDEFGHIJ" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unreadable_content_is_storage_fault() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;
    std::fs::create_dir(dir.path().join("notafile00")).unwrap();

    let (status, body) =
        post_json(&app, "/fetch", json!({ "document_link_id": "notafile00" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORAGE_FAULT");
}

#[tokio::test]
async fn test_metadata_failure_still_serves_content() {
    let repository = Arc::new(InMemoryDocumentRepository::with_failing_metadata());
    let mut config = AppConfig::default();
    config.server.response_delay = Duration::ZERO;
    let app = create_router(AppState::new(repository, config));

    let id = upload(&app, b"important", Some("cosmetic.txt")).await;
    let (status, body) = post_json(&app, "/fetch", json!({ "document_link_id": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        STANDARD.decode(body["content"].as_str().unwrap()).unwrap(),
        b"important"
    );
    assert!(body["filename"].is_null());
}

#[tokio::test]
async fn test_ten_thousand_uploads_get_unique_ids() {
    let repository = Arc::new(InMemoryDocumentRepository::new());
    let mut config = AppConfig::default();
    config.server.response_delay = Duration::ZERO;
    let app = create_router(AppState::new(repository.clone(), config));

    let mut ids = HashSet::new();
    for i in 0..10_000u32 {
        let id = upload(&app, &i.to_le_bytes(), None).await;
        assert!(ids.insert(id), "duplicate identifier after {i} uploads");
    }
    assert_eq!(ids.len(), 10_000);
    assert_eq!(repository.len(), 10_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_and_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path()).await;

    let tasks: Vec<_> = (0..32u32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let content = format!("document number {i}").into_bytes();
                let name = format!("doc-{i}.txt");
                let id = upload(&app, &content, Some(&name)).await;
                let (status, body) =
                    post_json(&app, "/fetch", json!({ "document_link_id": id })).await;
                assert_eq!(status, StatusCode::OK);
                assert_eq!(
                    STANDARD.decode(body["content"].as_str().unwrap()).unwrap(),
                    content
                );
                assert_eq!(body["filename"], name.as_str());
                id
            })
        })
        .collect();

    let ids: HashSet<String> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(ids.len(), 32);
}

#[tokio::test]
async fn test_response_delay_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let repository = FsDocumentRepository::open(dir.path()).await.unwrap();
    let mut config = test_config(dir.path());
    config.server.response_delay = Duration::from_millis(150);
    let app = create_router(AppState::new(Arc::new(repository), config));

    let started = std::time::Instant::now();
    upload(&app, b"slow", None).await;
    assert!(started.elapsed() >= Duration::from_millis(150));
}

// -- Preloaded documents -------------------------------------------------------

#[tokio::test]
async fn test_preloaded_document_is_served_without_upload() {
    let source = tempfile::tempdir().unwrap();
    let storage = tempfile::tempdir().unwrap();
    std::fs::write(source.path().join("large_mixed.zip"), b"PK\x03\x04seeded").unwrap();

    let entries = vec!["large_mixed.zip=000000000a".parse::<PreloadEntry>().unwrap()];
    let report = Preloader::new(source.path(), storage.path())
        .run(&entries)
        .await
        .unwrap();
    assert!(report.is_success());

    let app = test_app(storage.path()).await;
    let (status, body) =
        post_json(&app, "/fetch", json!({ "document_link_id": "000000000a" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        STANDARD.decode(body["content"].as_str().unwrap()).unwrap(),
        b"PK\x03\x04seeded"
    );
    assert_eq!(body["filename"], "large_mixed.zip");
}
