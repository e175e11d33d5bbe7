//! Background Run Task
//!
//! Drives a started run to completion on its own tokio task.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::harness::{Harness, RunOutcome, RunTicket};

/// Spawns the probe protocol for a run that `Harness::begin` already moved
/// into `Running`.
///
/// # Returns
/// A JoinHandle resolving to the run's outcome. Dropping it does not cancel
/// the run.
///
/// # Example
/// ```ignore
/// if let Some(ticket) = harness.begin("ttl", Some("p1")).await? {
///     let handle = spawn_run(harness.clone(), ticket);
/// }
/// ```
pub fn spawn_run(harness: Harness, ticket: RunTicket) -> JoinHandle<RunOutcome> {
    info!(
        "Spawning {} run against product {}",
        ticket.scenario().id(),
        ticket.target_id()
    );

    tokio::spawn(async move {
        let outcome = harness.execute(ticket).await;
        match &outcome {
            RunOutcome::Completed(metrics) => info!("Background run completed: {:?}", metrics),
            RunOutcome::Failed(failure) => warn!("Background run failed: {}", failure.reason),
            RunOutcome::AlreadyRunning => {}
        }
        outcome
    })
}
