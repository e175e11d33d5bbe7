//! Harness Module
//!
//! Cache-behavior verification: scenarios, probes, classification, the event
//! log, metrics, the per-run narrative and the orchestrator that sequences
//! a run.

mod classifier;
mod event_log;
mod metrics;
mod narrative;
mod orchestrator;
mod probe;
mod scenario;
mod tally;
mod timer;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use classifier::{
    cache_outcome, classify, freshness, is_latency_hit, Basis, Classification, Freshness,
    WriteContext,
};
pub use event_log::{ClassifiedEvent, EventKind, EventLog, EVENT_LOG_CAPACITY};
pub use metrics::{compute as compute_metrics, Metrics};
pub use narrative::{NarrativeEntry, RunNarrative, NARRATIVE_CAPACITY};
pub use orchestrator::{
    next_update, Harness, RunFailure, RunInfo, RunOutcome, RunState, RunTicket,
    DEFAULT_PROBE_DELAY, PRICE_DELTA, STOCK_DELTA,
};
pub use probe::{ProbeExecutor, ProbeKind, ProbeRequest, ProbeResult, TaggedProbe};
pub use scenario::{FreshnessExpectation, Scenario, ScenarioDescriptor, SettleWindows};
pub use tally::LiveTally;
pub use timer::{Timer, TokioTimer};
