// SPDX-License-Identifier: MIT
// ReconstructionEngine — model invocation and response validation.
//
// One Messages API call per reconstruction request, stateless between calls:
// no conversation or session state survives a request. Failures map onto
// four stable categories (timeout / refused / auth / malformed) so the
// coordinator never has to inspect transport-level detail.

use std::time::Duration;

use anyhow::{Context as _, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::capture::Capture;
use crate::reconstruct::model::{ModelConfig, ReconstructError};
use crate::reconstruct::prompt::{build_user_content, extract_html_document, SYSTEM_PROMPT};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─── API types (deserialize response) ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Invokes the generative model against a stored capture.
pub struct ReconstructionEngine {
    http: reqwest::Client,
    api_key: String,
    config: ModelConfig,
}

impl ReconstructionEngine {
    pub fn new(api_key: String, config: ModelConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build model API client")?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Ask the model for a self-contained HTML clone of `capture`.
    ///
    /// Single attempt: callers needing resilience retry at their own level.
    /// The returned string is a validated document starting at an HTML root.
    pub async fn reconstruct(&self, capture: &Capture) -> Result<String, ReconstructError> {
        let screenshot = self.load_screenshot(capture).await;
        let content = build_user_content(capture, self.config.max_html_chars, screenshot);

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": content }],
        });

        debug!(
            capture_id = %capture.id,
            model = %self.config.model,
            html_len = capture.raw_html.len(),
            "requesting reconstruction"
        );

        let response = self
            .http
            .post(format!("{}/v1/messages", self.config.api_base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReconstructError::ModelTimeout(self.config.request_timeout_secs)
                } else {
                    ReconstructError::ModelRefused("model API unreachable".to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ReconstructError::ModelAuthError(format!(
                "provider rejected the API credential (HTTP {status})"
            )));
        }
        if !status.is_success() {
            // 429 and 529 are the provider declining to serve right now;
            // other non-success statuses land in the same category.
            return Err(ReconstructError::ModelRefused(format!(
                "provider returned HTTP {status}"
            )));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|_| {
            ReconstructError::MalformedOutput("response body was not valid JSON".to_string())
        })?;

        if parsed.stop_reason.as_deref() == Some("refusal") {
            return Err(ReconstructError::ModelRefused(
                "model declined to reproduce this page".to_string(),
            ));
        }

        let text: String = parsed
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(ReconstructError::MalformedOutput(
                "response contained no text".to_string(),
            ));
        }

        extract_html_document(&text).ok_or_else(|| {
            ReconstructError::MalformedOutput(
                "response did not contain an HTML document root".to_string(),
            )
        })
    }

    /// Read and base64-encode the capture's screenshot for the image block.
    ///
    /// A missing or unreadable file degrades to text-only reconstruction.
    async fn load_screenshot(&self, capture: &Capture) -> Option<String> {
        let path = capture.screenshot_path.as_ref()?;
        match tokio::fs::read(path).await {
            Ok(bytes) if !bytes.is_empty() => Some(BASE64.encode(&bytes)),
            Ok(_) => None,
            Err(e) => {
                warn!(capture_id = %capture.id, err = %e, "screenshot unreadable — reconstructing text-only");
                None
            }
        }
    }
}
