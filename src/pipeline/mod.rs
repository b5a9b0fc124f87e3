// SPDX-License-Identifier: MIT
//! Pipeline coordinator — sequences capture → store → reconstruct.
//!
//! The only component that translates internal failure kinds into the
//! external response shapes. It performs no business logic of its own: the
//! stages do the work, the coordinator wires them together and keeps
//! internal error detail from leaking past a short diagnostic string.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::capture::{AssetInventory, CaptureEngine, CaptureError};
use crate::reconstruct::{ReconstructionEngine, ReconstructionResult};
use crate::store::{CaptureStore, StoreError};

/// Summary of a fresh capture, returned to the caller of `/webscrape`.
///
/// Carries the handle (`id`) for the later clone request plus enough
/// metadata to preview the capture without shipping the raw HTML.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub html_content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    pub assets_count: AssetInventory,
}

/// Sequences the two pipeline stages over the shared store.
pub struct Coordinator {
    capture_engine: Arc<CaptureEngine>,
    store: Arc<CaptureStore>,
    reconstruction_engine: Arc<ReconstructionEngine>,
}

impl Coordinator {
    pub fn new(
        capture_engine: Arc<CaptureEngine>,
        store: Arc<CaptureStore>,
        reconstruction_engine: Arc<ReconstructionEngine>,
    ) -> Self {
        Self {
            capture_engine,
            store,
            reconstruction_engine,
        }
    }

    /// Capture `url` and store the snapshot under a fresh identifier.
    ///
    /// A failed capture stores nothing — no partial record is ever
    /// retrievable afterwards.
    pub async fn start_capture(&self, url: &str) -> Result<CaptureSummary, CaptureError> {
        let capture = self.capture_engine.capture(url).await.map_err(|e| {
            warn!(url = %url, err = %e, "capture failed");
            e
        })?;

        let summary_url = capture.source_url.clone();
        let title = capture.title.clone();
        let html_content_length = capture.raw_html.len();
        let screenshot_url = capture.screenshot_url();
        let assets_count = capture.asset_inventory;

        let id = self.store.put(capture).await;
        info!(id = %id, url = %summary_url, "capture stored");

        Ok(CaptureSummary {
            id,
            url: summary_url,
            title,
            html_content_length,
            screenshot_url,
            assets_count,
        })
    }

    /// Reconstruct the capture stored under `id`.
    ///
    /// Every failure — unknown id, model trouble, malformed output — comes
    /// back in-band as `success = false` with a categorized message; a
    /// failed reconstruction never carries partial HTML.
    pub async fn finish_clone(&self, id: &str) -> ReconstructionResult {
        let capture = match self.store.get(id).await {
            Ok(c) => c,
            Err(StoreError::NotFound(_)) => {
                return ReconstructionResult::failed(format!("no capture found for id {id}"));
            }
        };

        match self.reconstruction_engine.reconstruct(&capture).await {
            Ok(html) => {
                info!(id = %id, bytes = html.len(), "reconstruction succeeded");
                ReconstructionResult::ok(html)
            }
            Err(e) => {
                warn!(id = %id, err = %e, "reconstruction failed");
                ReconstructionResult::failed(e.to_string())
            }
        }
    }

    pub fn store(&self) -> &CaptureStore {
        &self.store
    }
}
