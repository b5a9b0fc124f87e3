pub mod capture;
pub mod config;
pub mod doctor;
pub mod pipeline;
pub mod reconstruct;
pub mod rest;
pub mod store;

use std::sync::Arc;

use anyhow::Result;

use capture::CaptureEngine;
use config::ServiceConfig;
use pipeline::Coordinator;
use reconstruct::ReconstructionEngine;
use store::CaptureStore;

/// Shared application state passed to every HTTP handler.
///
/// The engines and the store are constructed once at startup and passed in
/// explicitly — there is no ambient global browser context or API client.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    pub coordinator: Arc<Coordinator>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire the pipeline together from config + the model API credential.
    pub fn new(config: Arc<ServiceConfig>, api_key: String) -> Result<Self> {
        let capture_engine = Arc::new(CaptureEngine::new(
            config.capture.clone(),
            config.screenshots_dir(),
        )?);
        let store = Arc::new(CaptureStore::new(config.store_capacity));
        let reconstruction_engine =
            Arc::new(ReconstructionEngine::new(api_key, config.model.clone())?);
        let coordinator = Arc::new(Coordinator::new(
            capture_engine,
            store,
            reconstruction_engine,
        ));

        Ok(Self {
            config,
            coordinator,
            started_at: std::time::Instant::now(),
        })
    }
}
