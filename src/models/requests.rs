//! Request DTOs for the harness API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for starting a run (POST /runs)
///
/// # Fields
/// - `scenario`: Scenario id (`none`, `ttl` or `ttl_invalidate`)
/// - `target_id`: Product to probe; discovered from the catalog when absent
#[derive(Debug, Clone, Deserialize)]
pub struct StartRunRequest {
    pub scenario: String,
    #[serde(default)]
    pub target_id: Option<String>,
}

impl StartRunRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.scenario.trim().is_empty() {
            return Some("Scenario cannot be empty".to_string());
        }
        None
    }
}
