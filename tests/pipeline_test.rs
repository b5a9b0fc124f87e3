// Pipeline + REST boundary tests.
//
// Spins up the HTTP server on a random port (the model API and the browser
// are never reached: the exercised paths fail or return before them).

use std::sync::Arc;

use reweave::capture::CaptureError;
use reweave::config::ServiceConfig;
use reweave::{rest, AppContext};
use tempfile::TempDir;

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Build a minimal AppContext over a temp data dir for testing.
fn make_test_ctx(dir: &TempDir, port: u16) -> Arc<AppContext> {
    let config = Arc::new(ServiceConfig::new(
        Some(port),
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
        None,
    ));
    Arc::new(AppContext::new(config, "test-api-key".to_string()).unwrap())
}

/// Bind the router on `port` and serve it in the background.
async fn spawn_server(ctx: Arc<AppContext>, port: u16) {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .unwrap();
    let router = rest::build_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

// ─── Coordinator behavior ─────────────────────────────────────────────────────

#[tokio::test]
async fn failed_capture_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let ctx = make_test_ctx(&dir, 0);

    let err = ctx.coordinator.start_capture("not a url").await.unwrap_err();
    assert!(matches!(err, CaptureError::InvalidUrl(_)));
    assert!(ctx.coordinator.store().is_empty().await);
}

#[tokio::test]
async fn clone_of_unknown_id_is_an_in_band_failure() {
    let dir = TempDir::new().unwrap();
    let ctx = make_test_ctx(&dir, 0);

    let result = ctx.coordinator.finish_clone("never-issued").await;
    assert!(!result.success);
    assert!(result.cloned_html.is_none());
    assert!(result.message.unwrap().contains("no capture found"));
}

// ─── HTTP boundary ────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_status_and_capture_count() {
    let dir = TempDir::new().unwrap();
    let port = find_free_port();
    let ctx = make_test_ctx(&dir, port);
    spawn_server(ctx, port).await;

    let body: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["captures"], 0);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn webscrape_rejects_invalid_url_with_detail() {
    let dir = TempDir::new().unwrap();
    let port = find_free_port();
    let ctx = make_test_ctx(&dir, port);
    spawn_server(ctx, port).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{port}/webscrape"))
        .json(&serde_json::json!({ "url": "not a url" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("invalid URL"));
}

#[tokio::test]
async fn clone_website_unknown_id_returns_success_false() {
    let dir = TempDir::new().unwrap();
    let port = find_free_port();
    let ctx = make_test_ctx(&dir, port);
    spawn_server(ctx, port).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{port}/clone-website"))
        .json(&serde_json::json!({ "url_id": "never-issued" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body.get("cloned_html").is_none());
    assert!(body["message"].as_str().unwrap().contains("no capture found"));
}

#[tokio::test]
async fn captures_listing_starts_empty() {
    let dir = TempDir::new().unwrap();
    let port = find_free_port();
    let ctx = make_test_ctx(&dir, port);
    spawn_server(ctx, port).await;

    let body: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/captures"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["captures"].as_array().unwrap().len(), 0);
}
