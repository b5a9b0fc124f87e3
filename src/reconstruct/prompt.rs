// SPDX-License-Identifier: MIT
// Prompt construction and model-output validation.
//
// The prompt supplies the model with the captured title, the raw HTML
// (clipped front-first when oversized), the asset inventory as a structural
// hint, and — when available — the screenshot as a base64 image block.
// Validation is the strict counterpart: the free-form response must reduce
// to a document with an HTML root or the reconstruction fails as malformed.

use serde_json::{json, Value};

use crate::capture::Capture;

/// System instruction for the reconstruction model.
pub const SYSTEM_PROMPT: &str = "\
You are an expert web developer specializing in creating accurate HTML clones of websites. \
Your objective is to replicate the visual appearance of the provided website as precisely as \
possible: layout, colors, font styles, spacing, element sizes, and component design. \
The output must be a single, complete, valid HTML file. All CSS must be embedded within a \
<style> tag in the <head>, and any necessary JavaScript within a <script> tag just before \
</body>. Do not include external stylesheets, scripts, or frameworks unless their use is \
verifiable from the provided HTML content. For images, use <img> tags referencing their \
original URLs where possible, otherwise a visually appropriate placeholder. \
Respond with the HTML document only, starting with <!DOCTYPE html>.";

/// Build the user-message content blocks for one capture.
///
/// `screenshot_png_base64` is included as an image block when present; a
/// capture without a usable screenshot reconstructs text-only without
/// failing the request.
pub fn build_user_content(
    capture: &Capture,
    max_html_chars: usize,
    screenshot_png_base64: Option<String>,
) -> Vec<Value> {
    let html_excerpt = truncate_html(&capture.raw_html, max_html_chars);
    let truncated = html_excerpt.len() < capture.raw_html.len();

    let inventory = &capture.asset_inventory;
    let mut context = format!(
        "Original page URL: {}\nPage title: {}\nStructural complexity: {} images, {} \
         stylesheets, {} scripts, {} anchor links.\n\nRaw HTML of the original page",
        capture.source_url,
        if capture.title.is_empty() {
            "(none)"
        } else {
            capture.title.as_str()
        },
        inventory.images,
        inventory.stylesheets,
        inventory.scripts,
        inventory.links,
    );
    if truncated {
        context.push_str(" (truncated — the document head and early body are complete)");
    }
    context.push_str(":\n\n```html\n");
    context.push_str(html_excerpt);
    context.push_str("\n```");

    let mut blocks = vec![json!({ "type": "text", "text": context })];

    if let Some(data) = screenshot_png_base64 {
        blocks.push(json!({
            "type": "image",
            "source": {
                "type": "base64",
                "media_type": "image/png",
                "data": data,
            },
        }));
        blocks.push(json!({
            "type": "text",
            "text": "Above is the rendered screenshot of the page. Prioritize matching it visually.",
        }));
    }

    blocks.push(json!({
        "type": "text",
        "text": "Provide the complete HTML for the cloned page, starting directly with <!DOCTYPE html>.",
    }));
    blocks
}

/// Clip HTML to at most `max` characters, keeping the front of the document.
///
/// Never splits a UTF-8 code point.
pub fn truncate_html(html: &str, max: usize) -> &str {
    if html.len() <= max {
        return html;
    }
    let mut end = max;
    while end > 0 && !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[..end]
}

/// Reduce a free-form model response to a validated HTML document.
///
/// Strips markdown fences, requires a document root, and normalizes a bare
/// `<html` root by prepending the doctype. Returns `None` for anything that
/// cannot be read as a document — the caller reports `MalformedOutput`.
pub fn extract_html_document(raw: &str) -> Option<String> {
    let body = strip_code_fences(raw);
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("<!doctype html") {
        Some(trimmed.to_string())
    } else if lower.starts_with("<html") {
        Some(format!("<!DOCTYPE html>\n{trimmed}"))
    } else {
        None
    }
}

/// Strip a surrounding markdown code fence (```html ... ``` or ``` ... ```).
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_fence) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("html") on the fence line.
    let body = match after_fence.find('\n') {
        Some(nl) => &after_fence[nl + 1..],
        None => after_fence,
    };
    match body.rfind("\n```") {
        Some(end) => &body[..end],
        None => body.strip_suffix("```").unwrap_or(body),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
