//! Response DTOs for the harness API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::harness::LiveTally;

/// Response body for POST /runs
#[derive(Debug, Clone, Serialize)]
pub struct StartRunResponse {
    /// Human-readable outcome
    pub message: String,
    /// Whether this request started a new run
    pub started: bool,
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl StartRunResponse {
    pub fn started(scenario: impl Into<String>, target_id: impl Into<String>) -> Self {
        let scenario = scenario.into();
        let target_id = target_id.into();
        Self {
            message: format!("Run '{}' started on product '{}'", scenario, target_id),
            started: true,
            scenario,
            target_id: Some(target_id),
        }
    }

    pub fn already_running(scenario: impl Into<String>) -> Self {
        Self {
            message: "A run is already in progress".to_string(),
            started: false,
            scenario: scenario.into(),
            target_id: None,
        }
    }
}

/// Response body for GET /status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub tally: LiveTally,
    /// Rounded hit percentage of the live counters
    pub hit_rate_percent: u64,
}

impl From<LiveTally> for StatusResponse {
    fn from(tally: LiveTally) -> Self {
        Self {
            hit_rate_percent: tally.hit_rate_percent(),
            tally,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
