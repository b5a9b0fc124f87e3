// SPDX-License-Identifier: MIT
// DOM text extraction — title and asset counts over serialized HTML.
//
// The capture engine receives the browser's serialized DOM as one string.
// Tag-level counting over that output needs no tree parse; compiled-once
// case-insensitive regexes cover it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capture::model::AssetInventory;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static IMG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img[\s>/]").unwrap());

// `rel=stylesheet` may appear before or after other attributes, quoted or not.
static STYLESHEET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<link[^>]*\brel\s*=\s*["']?stylesheet["']?[^>]*>"#).unwrap());

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<script[\s>]").unwrap());

static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a[\s>/]").unwrap());

/// Extract the page title from serialized HTML.
///
/// Returns an empty string when the document has no `<title>` element —
/// an untitled page is a valid capture, not a failure.
pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| collapse_whitespace(m.as_str()))
        .unwrap_or_default()
}

/// Count images, stylesheets, scripts, and anchors in serialized HTML.
///
/// Counts are non-negative by construction; a page with zero assets yields
/// an all-zero inventory.
pub fn count_assets(html: &str) -> AssetInventory {
    AssetInventory {
        images: IMG_RE.find_iter(html).count() as u32,
        stylesheets: STYLESHEET_RE.find_iter(html).count() as u32,
        scripts: SCRIPT_RE.find_iter(html).count() as u32,
        links: ANCHOR_RE.find_iter(html).count() as u32,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
