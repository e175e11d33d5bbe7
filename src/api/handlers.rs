//! API Handlers
//!
//! HTTP request handlers exposing the harness to the presentation layer.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::catalog::HttpCatalog;
use crate::error::{HarnessError, Result};
use crate::harness::{
    ClassifiedEvent, Harness, Metrics, NarrativeEntry, RunInfo, RunState, Scenario,
    ScenarioDescriptor, TaggedProbe,
};
use crate::models::{HealthResponse, StartRunRequest, StartRunResponse, StatusResponse};
use crate::tasks::spawn_run;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub harness: Harness,
}

impl AppState {
    /// Creates a new AppState around an existing harness.
    pub fn new(harness: Harness) -> Self {
        Self { harness }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP catalog client and a harness with the configured delays.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let catalog = HttpCatalog::from_config(config)?;
        let harness = Harness::new(Arc::new(catalog))
            .probe_delay(config.probe_delay())
            .settle_windows(config.settle_windows());
        Ok(Self::new(harness))
    }
}

/// Handler for POST /runs
///
/// Moves the harness into `Running` and drives the run in the background.
/// Answers 202 when a run was started and 409 when one is already in flight.
pub async fn start_run_handler(
    State(state): State<AppState>,
    Json(req): Json<StartRunRequest>,
) -> Result<(StatusCode, Json<StartRunResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(HarnessError::InvalidRequest(error_msg));
    }
    let scenario = Scenario::get(req.scenario.trim())?;

    if state.harness.run_state().await == RunState::Running {
        return Ok((
            StatusCode::CONFLICT,
            Json(StartRunResponse::already_running(scenario.id())),
        ));
    }

    let target_id = match req.target_id {
        Some(id) => Some(id),
        None => discover_target(&state.harness).await,
    };

    match state.harness.begin(scenario.id(), target_id.as_deref()).await? {
        Some(ticket) => {
            let response = StartRunResponse::started(scenario.id(), ticket.target_id());
            spawn_run(state.harness.clone(), ticket);
            Ok((StatusCode::ACCEPTED, Json(response)))
        }
        None => Ok((
            StatusCode::CONFLICT,
            Json(StartRunResponse::already_running(scenario.id())),
        )),
    }
}

/// First product id in the catalog, if it can be listed.
async fn discover_target(harness: &Harness) -> Option<String> {
    match harness.catalog().first_product().await {
        Ok(product) => product.and_then(|p| p.id),
        Err(err) => {
            warn!("Failed to fetch test product: {}", err);
            None
        }
    }
}

/// Handler for GET /runs/current
pub async fn run_info_handler(State(state): State<AppState>) -> Json<RunInfo> {
    Json(state.harness.run_info().await)
}

/// Handler for GET /runs/current/probes
pub async fn probes_handler(State(state): State<AppState>) -> Json<Vec<TaggedProbe>> {
    Json(state.harness.probe_results().await)
}

/// Handler for GET /runs/current/log
pub async fn narrative_handler(State(state): State<AppState>) -> Json<Vec<NarrativeEntry>> {
    Json(state.harness.narrative().await)
}

/// Handler for GET /events
pub async fn events_handler(State(state): State<AppState>) -> Json<Vec<ClassifiedEvent>> {
    Json(state.harness.event_log().await)
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Json<Metrics> {
    Json(state.harness.metrics().await)
}

/// Handler for GET /status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse::from(state.harness.tally().await))
}

/// Handler for GET /scenarios
pub async fn scenarios_handler(State(state): State<AppState>) -> Json<Vec<ScenarioDescriptor>> {
    Json(state.harness.scenarios())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
