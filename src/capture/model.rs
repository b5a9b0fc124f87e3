// SPDX-License-Identifier: MIT
// Capture data model types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for a headless browser capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Preflight HTTP fetch timeout in seconds. Defaults to 10.
    #[serde(default = "default_preflight_timeout_secs")]
    pub preflight_timeout_secs: u64,

    /// Whole browser invocation timeout in seconds. Defaults to 30.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Virtual-time budget in milliseconds the browser grants the page to
    /// settle (scripts, late-loading resources) before the DOM is serialized.
    /// Defaults to 10000.
    #[serde(default = "default_settle_budget_ms")]
    pub settle_budget_ms: u64,

    /// Viewport width in pixels. Defaults to 1280.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels. Defaults to 720.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

fn default_preflight_timeout_secs() -> u64 {
    10
}

fn default_navigation_timeout_secs() -> u64 {
    30
}

fn default_settle_budget_ms() -> u64 {
    10_000
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            preflight_timeout_secs: 10,
            navigation_timeout_secs: 30,
            settle_budget_ms: 10_000,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Structural counts of assets discovered in the captured DOM.
///
/// A coarse complexity signature: the reconstruction prompt uses these as a
/// hint about how much structure the model should expect to rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInventory {
    pub images: u32,
    pub stylesheets: u32,
    pub scripts: u32,
    pub links: u32,
}

/// One immutable snapshot of a scraped page.
///
/// Created atomically by the capture engine on a successful load, held by the
/// capture store until evicted, and read (never mutated) by the
/// reconstruction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capture {
    /// Opaque unique identifier, assigned by the store at insert time.
    /// Empty until the record has been stored.
    #[serde(default)]
    pub id: String,

    /// The captured URL after following redirects.
    pub source_url: String,

    /// Page title. Empty when the page has none — not a failure.
    pub title: String,

    /// Serialized rendered DOM at capture time.
    pub raw_html: String,

    /// Asset counts discovered in `raw_html`.
    pub asset_inventory: AssetInventory,

    /// Path of the persisted viewport screenshot, written once.
    /// `None` when the browser produced no usable image — the capture is
    /// still valid and reconstruction proceeds text-only.
    pub screenshot_path: Option<PathBuf>,

    /// RFC 3339 timestamp of when the capture completed.
    pub captured_at: DateTime<Utc>,
}

impl Capture {
    /// Public URL path under which the screenshot is served, if one exists.
    pub fn screenshot_url(&self) -> Option<String> {
        self.screenshot_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| format!("/public/screenshots/{}", name.to_string_lossy()))
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Capture-stage failures.
///
/// Every variant is a categorized, caller-safe description — the engine never
/// surfaces a raw underlying error. Nothing is retried here; retry policy
/// belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The input did not parse as an absolute http(s) URL. Raised before any
    /// network activity.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The page did not settle within the navigation timeout.
    #[error("navigation timed out after {0} seconds")]
    NavigationTimeout(u64),

    /// DNS, connection, TLS, or HTTP-level failure reaching the page.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The browser ran but produced no usable DOM.
    #[error("render failed: {0}")]
    Render(String),

    /// No headless-capable browser binary was found on PATH.
    #[error(
        "no headless browser found on PATH — install Chromium or Chrome \
         (one of: chromium, chrome, google-chrome, chromium-browser)"
    )]
    NoBrowser,
}
