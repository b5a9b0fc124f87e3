// SPDX-License-Identifier: MIT
// Reconstruction data model types.

use serde::{Deserialize, Serialize};

/// Generative model configuration.
///
/// The API credential itself is deliberately not part of this struct — it is
/// read from `ANTHROPIC_API_KEY` at startup and passed to the engine
/// directly, so it can never land in a config file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model API base URL. Defaults to https://api.anthropic.com.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model identifier. Defaults to claude-sonnet-4-5.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens the model may generate per reconstruction. Defaults to 4096.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Defaults to 0.2 — reconstruction rewards
    /// faithfulness over creativity.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Model call timeout in seconds. Defaults to 120.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Raw HTML is clipped to this many characters (front-first — the head
    /// of a document carries its structure and styling) before prompt
    /// construction. Defaults to 150000.
    #[serde(default = "default_max_html_chars")]
    pub max_html_chars: usize,
}

fn default_api_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_html_chars() -> usize {
    150_000
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            max_html_chars: default_max_html_chars(),
        }
    }
}

/// Outcome of feeding one capture to the model.
///
/// Exactly one of `cloned_html` / `message` is present, keyed on `success`.
/// A failed reconstruction never carries partial HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructionResult {
    pub success: bool,

    /// Complete, self-contained HTML document. Present iff `success`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloned_html: Option<String>,

    /// Human-readable categorized failure reason. Present iff `!success`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReconstructionResult {
    pub fn ok(cloned_html: String) -> Self {
        Self {
            success: true,
            cloned_html: Some(cloned_html),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            cloned_html: None,
            message: Some(message.into()),
        }
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Reconstruction-stage failures, one category per way the model call or its
/// output can go wrong. A single attempt per request — no internal retries.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    /// The model call did not complete within the timeout budget.
    #[error("model call timed out after {0} seconds")]
    ModelTimeout(u64),

    /// The provider declined to serve the request — rate limit, overload,
    /// or a content-policy refusal.
    #[error("model refused the request: {0}")]
    ModelRefused(String),

    /// The API credential was rejected.
    #[error("model authentication failed: {0}")]
    ModelAuthError(String),

    /// The response was empty or did not contain a parseable HTML document.
    #[error("model output was malformed: {0}")]
    MalformedOutput(String),
}
