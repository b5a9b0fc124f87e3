use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::error;

use crate::capture::CaptureConfig;
use crate::reconstruct::ModelConfig;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STORE_CAPACITY: usize = 128;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 8000).
    port: Option<u16>,
    /// Bind address for the HTTP server (default: "127.0.0.1").
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,reweave=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Maximum stored captures before oldest-first eviction (default: 128).
    store_capacity: Option<usize>,
    /// Capture engine configuration (`[capture]`).
    capture: Option<CaptureConfig>,
    /// Model configuration (`[model]`). The API key is never read from TOML.
    model: Option<ModelConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServiceConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Bind address for the HTTP server (REWEAVE_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    pub data_dir: PathBuf,
    pub log: String,
    /// "pretty" (default) | "json".
    pub log_format: String,
    /// Capture store bound — oldest entries are evicted past this.
    pub store_capacity: usize,
    pub capture: CaptureConfig,
    pub model: ModelConfig,
}

impl ServiceConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("REWEAVE_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("REWEAVE_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let store_capacity = toml.store_capacity.unwrap_or(DEFAULT_STORE_CAPACITY);

        let capture = toml.capture.unwrap_or_default();
        let model = toml.model.unwrap_or_default();

        Self {
            port,
            bind_address,
            data_dir,
            log,
            log_format,
            store_capacity,
            capture,
            model,
        }
    }

    /// Directory where screenshot artifacts are persisted and served from.
    pub fn screenshots_dir(&self) -> PathBuf {
        self.data_dir.join("screenshots")
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/reweave
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("reweave");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/reweave or ~/.local/share/reweave
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("reweave");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("reweave");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\reweave
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("reweave");
        }
    }
    // Fallback
    PathBuf::from(".reweave")
}
