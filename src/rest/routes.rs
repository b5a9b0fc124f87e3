// rest/routes.rs — HTTP route handlers.
//
// Handlers are thin: deserialize, delegate to the coordinator, translate
// the categorized outcome into status + body. Capture-stage failures use
// non-200 with a `detail` message; clone failures travel in-band in the
// 200 response shape (`success = false`).

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::capture::CaptureError;
use crate::pipeline::CaptureSummary;
use crate::reconstruct::ReconstructionResult;
use crate::AppContext;

#[derive(Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

pub async fn webscrape(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<UrlRequest>,
) -> Result<Json<CaptureSummary>, (StatusCode, Json<Value>)> {
    match ctx.coordinator.start_capture(&body.url).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => Err((capture_status(&e), Json(json!({ "detail": e.to_string() })))),
    }
}

#[derive(Deserialize)]
pub struct CloneRequest {
    pub url_id: String,
}

pub async fn clone_website(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CloneRequest>,
) -> Json<ReconstructionResult> {
    Json(ctx.coordinator.finish_clone(&body.url_id).await)
}

pub async fn list_captures(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let captures = ctx.coordinator.store().list().await;
    let list: Vec<Value> = captures
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "url": c.source_url,
                "title": c.title,
                "html_content_length": c.raw_html.len(),
                "screenshot_url": c.screenshot_url(),
                "captured_at": c.captured_at.to_rfc3339(),
            })
        })
        .collect();
    Json(json!({ "captures": list }))
}

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": ctx.started_at.elapsed().as_secs(),
        "captures": ctx.coordinator.store().len().await,
    }))
}

/// Map a capture failure category to its HTTP status.
fn capture_status(e: &CaptureError) -> StatusCode {
    match e {
        CaptureError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        CaptureError::NavigationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        CaptureError::Navigation(_) => StatusCode::BAD_GATEWAY,
        CaptureError::Render(_) | CaptureError::NoBrowser => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
