//! Cache Probe - A cache-behavior verification harness
//!
//! Drives a timed probe protocol against a remote catalog service and infers
//! its caching behavior (hit/miss, fresh/stale) from latency and data versions.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod harness;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use harness::Harness;
pub use tasks::spawn_run;
