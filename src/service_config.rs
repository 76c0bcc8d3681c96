// =============================================================================
// Service Configuration: file defaults plus environment overrides
// =============================================================================
//
// Everything tunable about the deployment lives here. All fields carry a
// serde default so a partial (or absent) `service_config.json` still loads.
//
// The indicator history window is deliberately not configurable; see
// `analysis::engine::HISTORY_PERIOD`.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default configuration file, resolved relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "service_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_anonymous_requests_per_window() -> u32 {
    5
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

fn default_chart_url() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}

fn default_screener_url() -> String {
    "https://query1.finance.yahoo.com/v1/finance/screener/predefined/saved".to_string()
}

fn default_mover_count() -> u32 {
    25
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// ServiceConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Keys that exempt a caller from the anonymous rate limit.
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Requests an anonymous client may make per window.
    #[serde(default = "default_anonymous_requests_per_window")]
    pub anonymous_requests_per_window: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Key anonymous callers by the first `x-forwarded-for` hop instead of
    /// the socket peer. Only safe behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,

    /// Yahoo chart endpoint; the symbol is appended as a path segment.
    #[serde(default = "default_chart_url")]
    pub chart_url: String,

    /// Yahoo predefined-screener endpoint used for movers.
    #[serde(default = "default_screener_url")]
    pub screener_url: String,

    /// Rows requested per mover ranking.
    #[serde(default = "default_mover_count")]
    pub mover_count: u32,

    /// Per-request timeout for outbound calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_keys: Vec::new(),
            anonymous_requests_per_window: default_anonymous_requests_per_window(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            trust_forwarded_for: false,
            chart_url: default_chart_url(),
            screener_url: default_screener_url(),
            mover_count: default_mover_count(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or malformed file is an error so the caller can fall back to
    /// defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            api_keys = config.api_keys.len(),
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply `MARKET_LENS_*` overrides from a variable lookup.
    ///
    /// Takes the lookup as a function so tests need not touch process state.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("MARKET_LENS_BIND_ADDR").filter(|a| !a.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(keys) = var("MARKET_LENS_API_KEYS") {
            self.api_keys = keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Some(flag) = var("MARKET_LENS_TRUST_FORWARDED_FOR") {
            self.trust_forwarded_for = matches!(flag.trim(), "1" | "true" | "TRUE" | "yes");
        }
    }
}
