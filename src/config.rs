//! Configuration Module
//!
//! Handles loading harness and server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::harness::SettleWindows;

/// Harness configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog service (without trailing slash)
    pub catalog_base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Per-probe transport timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Fixed delay between the early probes of a run, in milliseconds
    pub probe_delay_ms: u64,
    /// Settle window for scenarios without an invalidation guarantee
    pub settle_window_ms: u64,
    /// Settle window for scenarios that guarantee invalidation
    pub settle_window_invalidate_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CATALOG_BASE_URL` - Catalog endpoint root (default: http://localhost:8080/api/catalog)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PROBE_TIMEOUT_MS` - Per-probe timeout (default: 10000)
    /// - `PROBE_DELAY_MS` - Delay between early probes (default: 1000)
    /// - `SETTLE_WINDOW_MS` - Wait before the post-update read (default: 1000)
    /// - `SETTLE_WINDOW_INVALIDATE_MS` - Same, for invalidating scenarios (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.catalog_base_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            probe_timeout_ms: parse_var("PROBE_TIMEOUT_MS").unwrap_or(defaults.probe_timeout_ms),
            probe_delay_ms: parse_var("PROBE_DELAY_MS").unwrap_or(defaults.probe_delay_ms),
            settle_window_ms: parse_var("SETTLE_WINDOW_MS").unwrap_or(defaults.settle_window_ms),
            settle_window_invalidate_ms: parse_var("SETTLE_WINDOW_INVALIDATE_MS")
                .unwrap_or(defaults.settle_window_invalidate_ms),
        }
    }

    /// Per-probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Early-probe delay as a Duration.
    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }

    pub fn settle_windows(&self) -> SettleWindows {
        SettleWindows {
            guarantee: Duration::from_millis(self.settle_window_invalidate_ms),
            best_effort: Duration::from_millis(self.settle_window_ms),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_base_url: "http://localhost:8080/api/catalog".to_string(),
            server_port: 3000,
            probe_timeout_ms: 10_000,
            probe_delay_ms: 1000,
            settle_window_ms: 1000,
            settle_window_invalidate_ms: 3000,
        }
    }
}
