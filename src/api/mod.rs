//! API Module
//!
//! HTTP handlers and routing for the harness API.
//!
//! # Endpoints
//! - `POST /runs` - Start a run
//! - `GET /runs/current` - Run state and context
//! - `GET /runs/current/probes` - Tagged probes of the current run
//! - `GET /runs/current/log` - Progress notes of the current run
//! - `GET /events` - Event log, oldest first
//! - `GET /metrics` - Metrics of the last completed run
//! - `GET /status` - Live hit/miss/invalidation counters
//! - `GET /scenarios` - Available scenarios with their settle windows
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
