//! API Routes
//!
//! Configures the Axum router with all harness endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    events_handler, health_handler, metrics_handler, narrative_handler, probes_handler,
    run_info_handler, scenarios_handler, start_run_handler, status_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the dashboard is served separately
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/runs", post(start_run_handler))
        .route("/runs/current", get(run_info_handler))
        .route("/runs/current/probes", get(probes_handler))
        .route("/runs/current/log", get(narrative_handler))
        .route("/events", get(events_handler))
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler))
        .route("/scenarios", get(scenarios_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
