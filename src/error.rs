//! Error types for the probe harness
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Harness Error Enum ==
/// Unified error type for the harness and its HTTP surface.
///
/// An indeterminate freshness classification is deliberately absent here: it
/// is a soft outcome carried on the event, not a failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// Scenario id is not one of the registered scenarios
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// A run was requested without a usable target product
    #[error("No test product available")]
    NoTargetResource,

    /// Transport failure or non-2xx response from the catalog
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        HarnessError::Network(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for HarnessError {
    fn into_response(self) -> Response {
        let status = match &self {
            HarnessError::UnknownScenario(_) => StatusCode::BAD_REQUEST,
            HarnessError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            HarnessError::NoTargetResource => StatusCode::UNPROCESSABLE_ENTITY,
            HarnessError::Network(_) => StatusCode::BAD_GATEWAY,
            HarnessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;
