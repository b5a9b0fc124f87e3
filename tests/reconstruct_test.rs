// Reconstruction-stage tests: result wire shape, prompt coverage for
// zero-asset captures, and failure-category text.

use chrono::Utc;
use reweave::capture::{AssetInventory, Capture};
use reweave::reconstruct::prompt::{build_user_content, extract_html_document};
use reweave::reconstruct::{ReconstructError, ReconstructionResult};

fn zero_asset_capture() -> Capture {
    Capture {
        id: "cap-1".to_string(),
        source_url: "https://example.com/".to_string(),
        title: String::new(),
        raw_html: "<html><body><p>bare text only</p></body></html>".to_string(),
        asset_inventory: AssetInventory::default(),
        screenshot_path: None,
        captured_at: Utc::now(),
    }
}

// ─── Wire shape ───────────────────────────────────────────────────────────────

#[test]
fn success_result_carries_html_and_no_message() {
    let v = serde_json::to_value(ReconstructionResult::ok("<!DOCTYPE html>".into())).unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["cloned_html"], "<!DOCTYPE html>");
    assert!(v.get("message").is_none());
}

#[test]
fn failed_result_carries_message_and_no_html() {
    let v = serde_json::to_value(ReconstructionResult::failed("model call timed out")).unwrap();
    assert_eq!(v["success"], false);
    assert!(v.get("cloned_html").is_none());
    assert_eq!(v["message"], "model call timed out");
}

// ─── Zero-asset captures ──────────────────────────────────────────────────────

#[test]
fn zero_asset_capture_builds_a_complete_prompt() {
    let capture = zero_asset_capture();
    let blocks = build_user_content(&capture, 150_000, None);

    // Context block, no image block, closing instruction.
    assert!(blocks.len() >= 2);
    let context = blocks[0]["text"].as_str().unwrap();
    assert!(context.contains("0 images"));
    assert!(context.contains("(none)")); // empty title is stated, not omitted
    assert!(context.contains("bare text only"));
    assert!(blocks.iter().all(|b| b["type"] != "image"));
}

#[test]
fn validated_output_for_zero_asset_capture_is_a_document() {
    // The model owes a full document even when the capture references no
    // assets — validation enforces the root either way.
    let out = extract_html_document("<html><body>minimal</body></html>").unwrap();
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("<html>"));
}

// ─── Failure categories ───────────────────────────────────────────────────────

#[test]
fn timeout_category_names_the_budget() {
    let msg = ReconstructError::ModelTimeout(120).to_string();
    assert!(msg.contains("timed out"));
    assert!(msg.contains("120"));
}

#[test]
fn categories_have_distinct_stable_prefixes() {
    let timeout = ReconstructError::ModelTimeout(120).to_string();
    let refused = ReconstructError::ModelRefused("rate limited".into()).to_string();
    let auth = ReconstructError::ModelAuthError("HTTP 401".into()).to_string();
    let malformed = ReconstructError::MalformedOutput("no root".into()).to_string();

    assert!(timeout.starts_with("model call timed out"));
    assert!(refused.starts_with("model refused"));
    assert!(auth.starts_with("model authentication failed"));
    assert!(malformed.starts_with("model output was malformed"));
}

#[test]
fn no_partial_html_on_failure() {
    // A malformed response never leaks into cloned_html: the failed shape
    // has no html field at all.
    let result = ReconstructionResult::failed(
        ReconstructError::MalformedOutput("response contained no text".into()).to_string(),
    );
    assert!(result.cloned_html.is_none());
    assert!(result.message.unwrap().contains("malformed"));
}
