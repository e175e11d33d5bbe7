//! Background Tasks Module
//!
//! Runs started over the HTTP API execute in the background so the request
//! can return as soon as the run is in `Running`.

mod run;

pub use run::spawn_run;
