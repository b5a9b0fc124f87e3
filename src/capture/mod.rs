// SPDX-License-Identifier: MIT
//! Capture stage — deterministic extraction of a live page's rendered
//! content, asset inventory, and screenshot.

pub mod engine;
pub mod extract;
pub mod model;

pub use engine::CaptureEngine;
pub use model::{AssetInventory, Capture, CaptureConfig, CaptureError};
