// SPDX-License-Identifier: MIT
//! doctor.rs — pre-flight diagnostic checks for `reweave doctor`.
//!
//! This module is self-contained and does NOT require AppContext.
//! It runs before the server starts, so it can catch configuration
//! problems before they cause confusing startup failures.

use crate::capture::CaptureEngine;
use crate::config::ServiceConfig;

/// The result of a single diagnostic check.
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Run all diagnostic checks and return a list of results.
pub fn run_doctor(config: &ServiceConfig) -> Vec<CheckResult> {
    vec![
        check_port_available(config),
        check_browser_installed(),
        check_api_key_set(),
        check_screenshots_dir_writable(config),
    ]
}

// ─── Individual checks ────────────────────────────────────────────────────────

/// Check 1: the configured port is available (not in use by another process).
fn check_port_available(config: &ServiceConfig) -> CheckResult {
    let bind = format!("{}:{}", config.bind_address, config.port);
    let passed = std::net::TcpListener::bind(&bind).is_ok();
    CheckResult {
        name: "Port available",
        passed,
        detail: if passed {
            format!("{bind} is free")
        } else {
            format!("{bind} is in use by another process")
        },
    }
}

/// Check 2: a headless-capable Chromium binary is on PATH.
fn check_browser_installed() -> CheckResult {
    match CaptureEngine::detect_browser() {
        Some(browser) => CheckResult {
            name: "Headless browser installed",
            passed: true,
            detail: browser,
        },
        None => CheckResult {
            name: "Headless browser installed",
            passed: false,
            detail: "no Chromium/Chrome binary found in PATH".to_string(),
        },
    }
}

/// Check 3: the model API credential is configured.
fn check_api_key_set() -> CheckResult {
    let set = std::env::var("ANTHROPIC_API_KEY")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    CheckResult {
        name: "ANTHROPIC_API_KEY set",
        passed: set,
        detail: if set {
            "credential present".to_string()
        } else {
            "not set — the server refuses to start without it".to_string()
        },
    }
}

/// Check 4: the screenshots directory can be created and written.
fn check_screenshots_dir_writable(config: &ServiceConfig) -> CheckResult {
    let dir = config.screenshots_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        return CheckResult {
            name: "Screenshots dir writable",
            passed: false,
            detail: format!("cannot create {}: {e}", dir.display()),
        };
    }
    let probe = dir.join(".doctor_probe");
    match std::fs::write(&probe, b"ok") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            CheckResult {
                name: "Screenshots dir writable",
                passed: true,
                detail: dir.display().to_string(),
            }
        }
        Err(e) => CheckResult {
            name: "Screenshots dir writable",
            passed: false,
            detail: format!("cannot write to {}: {e}", dir.display()),
        },
    }
}

// ─── Output ───────────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

pub fn print_doctor_results(results: &[CheckResult]) {
    println!();
    println!("{BOLD}reweave doctor — pre-flight checks{RESET}");
    println!("{}", "─".repeat(60));

    for r in results {
        let (symbol, color) = if r.passed {
            ("✓", GREEN)
        } else {
            ("✗", RED)
        };
        println!(
            "  {color}{symbol}{RESET}  {:<30}  {}",
            r.name, r.detail
        );
    }

    println!("{}", "─".repeat(60));

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        println!("{GREEN}All checks passed.{RESET}");
    } else {
        println!("{RED}{failed} check(s) failed. See above for details.{RESET}");
    }
    println!();
}
