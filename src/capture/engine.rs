// SPDX-License-Identifier: MIT
// CaptureEngine — headless browser page capture.
//
// Strategy:
//   1. validate_url() rejects anything that is not an absolute http(s) URL
//      before any network activity.
//   2. A preflight reqwest GET follows redirects; the response's final URL
//      becomes the capture's source_url, and DNS/TLS/connection failures are
//      reported as categorized navigation errors.
//   3. detect_browser() searches PATH for a supported Chromium binary.
//   4. One browser invocation with --headless, --dump-dom, --screenshot,
//      --virtual-time-budget, and --window-size=WxH renders the page:
//      stdout carries the serialized DOM, the PNG lands in a temp dir.
//   5. The screenshot is validated for size and persisted under the
//      screenshots directory; a missing or oversized image degrades to a
//      screenshot-less capture rather than failing it.
//
// No retries happen here — retry policy belongs to the caller.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use tempfile::TempDir;
use tokio::io::AsyncReadExt as _;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::capture::extract::{count_assets, extract_title};
use crate::capture::model::{Capture, CaptureConfig, CaptureError};

/// Maximum persisted screenshot size (10 MB raw PNG bytes).
const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Browser binaries to probe, in preference order.
const CANDIDATE_BROWSERS: &[&str] = &["chromium", "chrome", "google-chrome", "chromium-browser"];

/// Drives a headless browser to snapshot a page's rendered content.
///
/// Holds one shared HTTP client for preflight fetches; each capture spawns
/// its own browser process, so concurrent captures never contend on a
/// shared browser context.
pub struct CaptureEngine {
    http: reqwest::Client,
    config: CaptureConfig,
    screenshots_dir: PathBuf,
}

impl CaptureEngine {
    pub fn new(config: CaptureConfig, screenshots_dir: PathBuf) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.preflight_timeout_secs))
            .build()
            .context("failed to build preflight HTTP client")?;
        Ok(Self {
            http,
            config,
            screenshots_dir,
        })
    }

    /// Detect the first headless-capable browser binary on PATH.
    pub fn detect_browser() -> Option<String> {
        for candidate in CANDIDATE_BROWSERS {
            if which_browser(candidate) {
                debug!(browser = *candidate, "headless browser detected on PATH");
                return Some((*candidate).to_string());
            }
        }
        None
    }

    /// Capture `url`: rendered DOM, title, asset counts, and a screenshot.
    ///
    /// Redirects are followed; the final URL becomes the capture's
    /// `source_url`. Pages with no title or zero assets are valid captures.
    ///
    /// # Errors
    ///
    /// Returns a categorized `CaptureError`; the underlying transport or
    /// process error is reduced to a short diagnostic string.
    pub async fn capture(&self, url: &str) -> Result<Capture, CaptureError> {
        // 1. Validate before touching the network.
        let parsed = validate_url(url)?;

        // 2. Preflight fetch — resolves redirects and categorizes
        //    DNS/TLS/connection failures the one-shot browser run cannot.
        let response = self.http.get(parsed.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                CaptureError::NavigationTimeout(self.config.preflight_timeout_secs)
            } else {
                CaptureError::Navigation(short_reqwest_error(&e))
            }
        })?;
        let response = response
            .error_for_status()
            .map_err(|e| CaptureError::Navigation(short_reqwest_error(&e)))?;
        let source_url = response.url().to_string();

        // 3. Rendered capture.
        let browser = Self::detect_browser().ok_or(CaptureError::NoBrowser)?;
        let (raw_html, screenshot_path) = self.render(&browser, &source_url).await?;

        if raw_html.trim().is_empty() {
            return Err(CaptureError::Render(
                "browser produced no DOM output".to_string(),
            ));
        }

        let title = extract_title(&raw_html);
        let asset_inventory = count_assets(&raw_html);

        debug!(
            url = %source_url,
            title = %title,
            images = asset_inventory.images,
            stylesheets = asset_inventory.stylesheets,
            scripts = asset_inventory.scripts,
            links = asset_inventory.links,
            "page captured"
        );

        Ok(Capture {
            id: String::new(),
            source_url,
            title,
            raw_html,
            asset_inventory,
            screenshot_path,
            captured_at: Utc::now(),
        })
    }

    /// Run the browser once: DOM to stdout, screenshot into a temp dir.
    ///
    /// Returns the serialized DOM and the persisted screenshot path (`None`
    /// when the browser produced no usable image).
    async fn render(
        &self,
        browser: &str,
        url: &str,
    ) -> Result<(String, Option<PathBuf>), CaptureError> {
        let tmp = TempDir::new().map_err(|e| CaptureError::Render(e.to_string()))?;
        let tmp_screenshot = tmp.path().join("screenshot.png");

        let window_size = format!(
            "{},{}",
            self.config.viewport_width, self.config.viewport_height
        );
        let mut cmd = Command::new(browser);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--dump-dom")
            .arg(format!(
                "--screenshot={}",
                tmp_screenshot.to_string_lossy()
            ))
            .arg(format!("--window-size={window_size}"))
            .arg(format!(
                "--virtual-time-budget={}",
                self.config.settle_budget_ms
            ))
            .arg(url)
            .current_dir(tmp.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        debug!(browser = %browser, url = %url, "spawning headless browser");

        let mut child = cmd
            .spawn()
            .map_err(|e| CaptureError::Render(format!("failed to start browser: {e}")))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::Render("browser stdout unavailable".to_string()))?;

        let mut dom = String::new();
        let wait = async {
            stdout.read_to_string(&mut dom).await?;
            child.wait().await
        };

        let wait_result = timeout(
            Duration::from_secs(self.config.navigation_timeout_secs),
            wait,
        )
        .await;

        match wait_result {
            Err(_elapsed) => {
                // Timeout — kill the child to avoid zombie processes.
                let _ = child.kill().await;
                warn!(url = %url, secs = self.config.navigation_timeout_secs, "browser capture timed out");
                return Err(CaptureError::NavigationTimeout(
                    self.config.navigation_timeout_secs,
                ));
            }
            Ok(Err(e)) => {
                return Err(CaptureError::Render(e.to_string()));
            }
            Ok(Ok(status)) => {
                if !status.success() {
                    // Non-zero exit — the DOM dump may still be complete.
                    warn!(url = %url, status = ?status, "browser exited with non-zero status");
                }
            }
        }

        let screenshot_path = self.persist_screenshot(&tmp_screenshot, url).await;
        Ok((dom, screenshot_path))
    }

    /// Move the browser's PNG into the screenshots directory under a fresh
    /// artifact name. Written once, never mutated afterwards.
    ///
    /// Any failure here degrades to `None`: the original pipeline continued
    /// a capture whose screenshot could not be taken, and reconstruction
    /// works text-only.
    async fn persist_screenshot(&self, tmp_screenshot: &Path, url: &str) -> Option<PathBuf> {
        let meta = match tokio::fs::metadata(tmp_screenshot).await {
            Ok(m) => m,
            Err(_) => {
                warn!(url = %url, "browser produced no screenshot — continuing without one");
                return None;
            }
        };
        if meta.len() == 0 {
            warn!(url = %url, "browser produced an empty screenshot — continuing without one");
            return None;
        }
        if meta.len() > MAX_IMAGE_BYTES {
            warn!(url = %url, bytes = meta.len(), "screenshot exceeds size limit — continuing without one");
            return None;
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.screenshots_dir).await {
            warn!(err = %e, "cannot create screenshots directory — continuing without screenshot");
            return None;
        }

        let dest = self
            .screenshots_dir
            .join(format!("{}.png", uuid::Uuid::new_v4()));
        // Copy rather than rename: the temp dir may sit on another filesystem.
        match tokio::fs::copy(tmp_screenshot, &dest).await {
            Ok(_) => Some(dest),
            Err(e) => {
                warn!(err = %e, "failed to persist screenshot — continuing without one");
                None
            }
        }
    }
}

/// Validate that `url` is a syntactically well-formed absolute http(s) URL.
///
/// Rejects everything else with `InvalidUrl` — no network activity happens
/// for invalid input.
pub fn validate_url(url: &str) -> Result<Url, CaptureError> {
    let parsed =
        Url::parse(url).map_err(|_| CaptureError::InvalidUrl(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CaptureError::InvalidUrl(url.to_string()));
    }
    if parsed.host_str().is_none() {
        return Err(CaptureError::InvalidUrl(url.to_string()));
    }
    Ok(parsed)
}

/// Check if a browser binary is available on PATH using `which` semantics.
fn which_browser(binary: &str) -> bool {
    if let Ok(path_var) = std::env::var("PATH") {
        for dir in path_var.split(':') {
            let candidate = Path::new(dir).join(binary);
            if candidate.is_file() {
                return true;
            }
        }
    }
    false
}

/// Reduce a reqwest error to a one-line diagnostic without internal detail.
fn short_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_connect() {
        "connection failed".to_string()
    } else if let Some(status) = e.status() {
        format!("server responded with HTTP {status}")
    } else if e.is_request() {
        "request could not be sent".to_string()
    } else {
        "transport error".to_string()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_http_urls_accepted() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/a/b?q=1").is_ok());
    }

    #[test]
    fn relative_and_junk_rejected() {
        for bad in ["not a url", "/relative/path", "example.com", ""] {
            assert!(matches!(
                validate_url(bad),
                Err(CaptureError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn non_http_schemes_rejected() {
        for bad in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)"] {
            assert!(matches!(
                validate_url(bad),
                Err(CaptureError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn redirect_target_keeps_query() {
        let u = validate_url("https://example.com/path?page=2").unwrap();
        assert_eq!(u.as_str(), "https://example.com/path?page=2");
    }
}
