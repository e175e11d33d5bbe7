//! Request and Response models for the harness API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::StartRunRequest;
pub use responses::{ErrorResponse, HealthResponse, StartRunResponse, StatusResponse};
