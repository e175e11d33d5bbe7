//! Test Orchestrator
//!
//! Sequences probes, delays and classification into one run and owns the
//! run-scoped state alongside the cross-run event log and metrics.
//!
//! A run is a strict linear sequence: probe N+1 never starts before probe N
//! and the delay after it have resolved. The lock is only held between
//! suspension points, never across a probe or a delay.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::classifier::{self, Classification, WriteContext};
use super::event_log::{ClassifiedEvent, EventKind, EventLog};
use super::metrics::{self, Metrics};
use super::narrative::{NarrativeEntry, RunNarrative};
use super::probe::{ProbeExecutor, ProbeRequest, ProbeResult, TaggedProbe};
use super::scenario::{Scenario, ScenarioDescriptor, SettleWindows};
use super::tally::LiveTally;
use super::timer::{Timer, TokioTimer};
use crate::catalog::{Catalog, ProductUpdate};
use crate::error::{HarnessError, Result};

/// Fixed delay between the early probes of a run.
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(1000);

/// Price and stock increments applied by the write probe.
pub const PRICE_DELTA: f64 = 10.0;
pub const STOCK_DELTA: i64 = 5;

const BASELINE_READ: &str = "baseline read";
const REPEAT_READ: &str = "repeat read";
const UPDATE: &str = "update";
const POST_UPDATE_READ: &str = "post-update read";

// == Run State ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// Why a run ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    /// Label of the probe that failed, if a probe was reached
    pub probe: Option<String>,
    pub reason: String,
}

/// Result of `start_run`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Metrics),
    Failed(RunFailure),
    /// A run was already in progress; nothing was changed
    AlreadyRunning,
}

/// Run state plus the context it was started with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInfo {
    pub state: RunState,
    pub scenario: Option<Scenario>,
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
}

/// Proof that `begin` moved the harness into `Running`.
#[derive(Debug)]
pub struct RunTicket {
    scenario: Scenario,
    target_id: String,
}

impl RunTicket {
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

#[derive(Debug, Default)]
struct HarnessState {
    run_state: RunState,
    scenario: Option<Scenario>,
    target_id: Option<String>,
    failure: Option<RunFailure>,
    probes: Vec<TaggedProbe>,
    events: EventLog,
    metrics: Metrics,
    tally: LiveTally,
    narrative: RunNarrative,
}

// == Harness ==
/// One independent harness instance. Clones share the same state.
#[derive(Clone)]
pub struct Harness {
    state: Arc<RwLock<HarnessState>>,
    executor: ProbeExecutor,
    timer: Arc<dyn Timer>,
    probe_delay: Duration,
    settle_windows: SettleWindows,
}

impl Harness {
    /// Creates a harness probing `catalog` with real timers.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self::with_timer(catalog, Arc::new(TokioTimer))
    }

    /// Creates a harness whose protocol delays go through `timer`.
    pub fn with_timer(catalog: Arc<dyn Catalog>, timer: Arc<dyn Timer>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HarnessState::default())),
            executor: ProbeExecutor::new(catalog),
            timer,
            probe_delay: DEFAULT_PROBE_DELAY,
            settle_windows: SettleWindows::default(),
        }
    }

    /// Overrides the delay between the early probes.
    pub fn probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    /// Overrides the wait between the write probe and the post-update read.
    pub fn settle_windows(mut self, windows: SettleWindows) -> Self {
        self.settle_windows = windows;
        self
    }

    /// Scenario descriptors with the settle windows this harness uses.
    pub fn scenarios(&self) -> Vec<ScenarioDescriptor> {
        Scenario::ALL
            .into_iter()
            .map(|s| s.descriptor_with(&self.settle_windows))
            .collect()
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        self.executor.catalog()
    }

    // == Start Run ==
    /// Validates, starts and drives a full run to completion or failure.
    pub async fn start_run(&self, scenario_id: &str, target_id: Option<&str>) -> Result<RunOutcome> {
        match self.begin(scenario_id, target_id).await? {
            Some(ticket) => Ok(self.execute(ticket).await),
            None => Ok(RunOutcome::AlreadyRunning),
        }
    }

    /// Synchronous part of `start_run`: validation and the move to `Running`.
    ///
    /// Returns `Ok(None)` without touching any state if a run is in flight.
    pub async fn begin(&self, scenario_id: &str, target_id: Option<&str>) -> Result<Option<RunTicket>> {
        let scenario = Scenario::get(scenario_id)?;

        let mut state = self.state.write().await;
        if state.run_state == RunState::Running {
            info!("Run already in progress, ignoring start request for {}", scenario.id());
            return Ok(None);
        }

        let target_id = target_id.map(str::trim).filter(|id| !id.is_empty());
        state.scenario = Some(scenario);

        // the previous run's probes and tally survive a start that never runs
        let Some(target_id) = target_id else {
            let err = HarnessError::NoTargetResource;
            warn!("Cannot start {} run: {}", scenario.id(), err);
            state.run_state = RunState::Failed;
            state.target_id = None;
            state.failure = Some(RunFailure {
                probe: None,
                reason: err.to_string(),
            });
            state
                .events
                .append(ClassifiedEvent::new(EventKind::Error, err.to_string()));
            state.narrative.note(format!("Cannot start test: {}", err));
            return Err(err);
        };

        state.probes.clear();
        state.tally = LiveTally::new();
        state.narrative.clear();
        state.narrative.note(format!(
            "Starting {} test on product {}",
            scenario.name(),
            target_id
        ));
        state.run_state = RunState::Running;
        state.target_id = Some(target_id.to_string());
        state.failure = None;
        info!(
            "Starting cache test for scenario {} on product {}",
            scenario.name(),
            target_id
        );

        Ok(Some(RunTicket {
            scenario,
            target_id: target_id.to_string(),
        }))
    }

    /// Drives the probe protocol for a run started by `begin`.
    pub async fn execute(&self, ticket: RunTicket) -> RunOutcome {
        let RunTicket {
            scenario,
            target_id,
        } = ticket;

        // Probe 1: baseline read, always a miss
        let baseline = self
            .executor
            .execute(BASELINE_READ, &ProbeRequest::Read, &target_id)
            .await;
        if !baseline.success {
            return self.abort(baseline).await;
        }
        let classification = classifier::classify(&baseline, None, None, scenario);
        self.record_read(&baseline, None, classification).await;

        self.timer.sleep(self.probe_delay).await;

        // Probe 2: repeat read against the baseline
        let repeat = self
            .executor
            .execute(REPEAT_READ, &ProbeRequest::Read, &target_id)
            .await;
        if !repeat.success {
            return self.abort(repeat).await;
        }
        let classification = classifier::classify(&repeat, Some(&baseline), None, scenario);
        self.record_read(&repeat, Some(&baseline), classification).await;

        self.timer.sleep(self.probe_delay).await;

        // Probe 3: write a deterministic delta
        let update = next_update(&baseline);
        let write = self
            .executor
            .execute(UPDATE, &ProbeRequest::Write(update.clone()), &target_id)
            .await;
        if !write.success {
            return self.abort(write).await;
        }
        self.record_write(&baseline, &write, &update, scenario).await;

        let settle = self.settle_windows.for_scenario(scenario);
        info!("Waiting {}ms for cache invalidation", settle.as_millis());
        self.state
            .write()
            .await
            .narrative
            .note(format!("Waiting {}ms for cache invalidation", settle.as_millis()));
        self.timer.sleep(settle).await;

        // Probe 4: read after the settle window
        let post = self
            .executor
            .execute(POST_UPDATE_READ, &ProbeRequest::Read, &target_id)
            .await;
        if !post.success {
            return self.abort(post).await;
        }
        let context = WriteContext::from_write(&write, update.price);
        let classification = classifier::classify(&post, Some(&baseline), Some(&context), scenario);
        self.record_read(&post, Some(&baseline), classification).await;

        self.complete().await
    }

    async fn record_read(
        &self,
        result: &ProbeResult,
        baseline: Option<&ProbeResult>,
        classification: Classification,
    ) {
        info!(
            "{}: {}ms - {:?} ({:?})",
            result.label, result.latency_ms, classification.kind, classification.basis
        );

        let (outcome, _) = classifier::cache_outcome(result, baseline);
        let mut state = self.state.write().await;
        match outcome {
            EventKind::Hit => state.tally.record_hit(result.payload.as_ref()),
            _ => state.tally.record_miss(result.payload.as_ref()),
        }
        state.narrative.note(format!(
            "{}: {}ms ({})",
            result.label,
            result.latency_ms,
            classification.description
        ));
        state.events.append(classification.to_event());
        state.probes.push(
            TaggedProbe::new(result.clone(), classification.kind)
                .with_freshness(classification.freshness),
        );
    }

    async fn record_write(
        &self,
        baseline: &ProbeResult,
        write: &ProbeResult,
        update: &ProductUpdate,
        scenario: Scenario,
    ) {
        info!(
            "Update successful: version {:?} -> {:?}",
            baseline.version(),
            write.version()
        );

        let mut state = self.state.write().await;
        state.narrative.note(format!(
            "Update applied: version {} -> {}",
            describe_version(baseline.version()),
            describe_version(write.version())
        ));
        state.events.append(ClassifiedEvent::new(
            EventKind::Update,
            format!("Product updated - price changed to ${:.2}", update.price),
        ));
        if scenario.emits_invalidation() {
            state.tally.record_invalidation();
            state.events.append(ClassifiedEvent::new(
                EventKind::Invalidation,
                "Invalidation event sent",
            ));
        }
        state
            .probes
            .push(TaggedProbe::new(write.clone(), EventKind::Update));
    }

    async fn abort(&self, failed: ProbeResult) -> RunOutcome {
        let reason = failed
            .error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        error!("{} failed: {}", failed.label, reason);

        let failure = RunFailure {
            probe: Some(failed.label.clone()),
            reason,
        };

        let mut state = self.state.write().await;
        state.events.append(ClassifiedEvent::new(
            EventKind::Error,
            format!("{} failed: {}", failed.label, failure.reason),
        ));
        state
            .narrative
            .note(format!("{} failed: {}", failed.label, failure.reason));
        state.probes.push(TaggedProbe::new(failed, EventKind::Error));
        state.failure = Some(failure.clone());
        state.run_state = RunState::Failed;

        RunOutcome::Failed(failure)
    }

    async fn complete(&self) -> RunOutcome {
        let mut state = self.state.write().await;
        let metrics = metrics::compute(&state.probes);
        state.metrics = metrics;
        state.run_state = RunState::Completed;
        state.narrative.note(format!(
            "Test completed: avg latency {}ms, hit rate {}%",
            metrics.avg_latency_ms, metrics.cache_hit_rate_percent
        ));
        info!(
            "Cache test completed: avg_latency={}ms hit_rate={}% stale={}",
            metrics.avg_latency_ms, metrics.cache_hit_rate_percent, metrics.stale_data_detected
        );
        RunOutcome::Completed(metrics)
    }

    // == Accessors ==
    pub async fn run_state(&self) -> RunState {
        self.state.read().await.run_state
    }

    pub async fn run_info(&self) -> RunInfo {
        let state = self.state.read().await;
        RunInfo {
            state: state.run_state,
            scenario: state.scenario,
            target_id: state.target_id.clone(),
            failure: state.failure.clone(),
        }
    }

    /// Tagged probes of the current or most recent run.
    pub async fn probe_results(&self) -> Vec<TaggedProbe> {
        self.state.read().await.probes.clone()
    }

    /// Event log, oldest first.
    pub async fn event_log(&self) -> Vec<ClassifiedEvent> {
        self.state.read().await.events.list()
    }

    /// Metrics of the most recently completed run.
    pub async fn metrics(&self) -> Metrics {
        self.state.read().await.metrics
    }

    pub async fn tally(&self) -> LiveTally {
        self.state.read().await.tally.clone()
    }

    /// Notes on the current or most recent run, oldest first.
    pub async fn narrative(&self) -> Vec<NarrativeEntry> {
        self.state.read().await.narrative.entries()
    }
}

fn describe_version(version: Option<i64>) -> String {
    version.map_or_else(|| "?".to_string(), |v| v.to_string())
}

/// Price/stock delta applied on top of the baseline read.
///
/// Missing baseline fields are treated as zero.
pub fn next_update(baseline: &ProbeResult) -> ProductUpdate {
    let price = baseline.price().unwrap_or(0.0) + PRICE_DELTA;
    ProductUpdate {
        price: (price * 100.0).round() / 100.0,
        stock: baseline.stock().unwrap_or(0) + STOCK_DELTA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::test_support::{RecordingTimer, ScriptedCatalog};
    use crate::harness::FreshnessExpectation;
    use tokio_test::assert_ok;

    fn harness(catalog: ScriptedCatalog) -> (Harness, Arc<ScriptedCatalog>, Arc<RecordingTimer>) {
        let catalog = Arc::new(catalog);
        let timer = Arc::new(RecordingTimer::default());
        let harness = Harness::with_timer(catalog.clone(), timer.clone());
        (harness, catalog, timer)
    }

    fn kinds(events: &[ClassifiedEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_invalidate_end_to_end() {
        let (harness, _, timer) = harness(ScriptedCatalog::new(&[180, 20, 25], 40));

        let outcome = assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);

        let expected = Metrics {
            avg_latency_ms: 75,
            cache_hit_rate_percent: 50,
            stale_data_detected: false,
        };
        assert_eq!(outcome, RunOutcome::Completed(expected));
        assert_eq!(harness.run_state().await, RunState::Completed);
        assert_eq!(harness.metrics().await, expected);

        assert_eq!(
            kinds(&harness.event_log().await),
            vec![
                EventKind::Miss,
                EventKind::Hit,
                EventKind::Update,
                EventKind::Invalidation,
                EventKind::Fresh
            ]
        );

        let probes = harness.probe_results().await;
        assert_eq!(probes.len(), 4);
        assert_eq!(probes[2].tag, EventKind::Update);
        assert_eq!(probes[2].result.version(), Some(2));
        assert_eq!(probes[3].result.price(), Some(20.0));

        assert_eq!(
            timer.delays(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(1000),
                Duration::from_millis(3000)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_run_without_invalidation() {
        let (harness, _, timer) = harness(ScriptedCatalog::new(&[180, 20, 25], 40));

        assert_ok!(harness.start_run("ttl", Some("p1")).await);

        let events = kinds(&harness.event_log().await);
        assert!(!events.contains(&EventKind::Invalidation));
        assert_eq!(timer.delays().last(), Some(&Duration::from_millis(1000)));
        assert_eq!(harness.tally().await.invalidations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_read_sets_flag() {
        let (harness, _, _) = harness(ScriptedCatalog::new(&[180, 20, 20], 40).serving_stale());

        let outcome = assert_ok!(harness.start_run("ttl", Some("p1")).await);

        match outcome {
            RunOutcome::Completed(metrics) => {
                assert!(metrics.stale_data_detected);
                // baseline miss + repeat hit; the stale probe is not counted
                assert_eq!(metrics.cache_hit_rate_percent, 50);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            harness.event_log().await.last().map(|e| e.kind),
            Some(EventKind::Stale)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_keeps_partial_results() {
        let (harness, catalog, timer) =
            harness(ScriptedCatalog::new(&[180, 20, 25], 40).failing_writes());

        let outcome = assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);

        let failure = match outcome {
            RunOutcome::Failed(failure) => failure,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(failure.probe.as_deref(), Some("update"));
        assert!(failure.reason.contains("HTTP 500"));

        assert_eq!(harness.run_state().await, RunState::Failed);
        let probes = harness.probe_results().await;
        assert_eq!(probes.len(), 3);
        assert_eq!(probes[2].tag, EventKind::Error);
        assert!(!probes[2].result.success);

        let events = harness.event_log().await;
        assert_eq!(events.last().unwrap().kind, EventKind::Error);
        assert!(events.last().unwrap().description.contains("HTTP 500"));

        // no settle window, no fourth read, metrics untouched
        assert_eq!(timer.delays().len(), 2);
        assert_eq!(catalog.reads(), 2);
        assert_eq!(harness.metrics().await, Metrics::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_failure_aborts_immediately() {
        let (harness, catalog, timer) =
            harness(ScriptedCatalog::new(&[180, 20, 25], 40).failing_read(0));

        let outcome = assert_ok!(harness.start_run("none", Some("p1")).await);

        assert!(matches!(outcome, RunOutcome::Failed(_)));
        assert_eq!(harness.probe_results().await.len(), 1);
        assert!(timer.delays().is_empty());
        assert_eq!(catalog.writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_target_fails_run() {
        let (harness, catalog, _) = harness(ScriptedCatalog::new(&[180, 20, 25], 40));

        let result = harness.start_run("ttl", Some("   ")).await;

        assert_eq!(result, Err(HarnessError::NoTargetResource));
        assert_eq!(harness.run_state().await, RunState::Failed);
        assert_eq!(harness.event_log().await[0].kind, EventKind::Error);
        assert_eq!(catalog.reads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_read_failure_skips_write() {
        let (harness, catalog, timer) =
            harness(ScriptedCatalog::new(&[180, 20, 25], 40).failing_read(1));

        let outcome = assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);

        let failure = match outcome {
            RunOutcome::Failed(failure) => failure,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(failure.probe.as_deref(), Some(REPEAT_READ));

        let probes = harness.probe_results().await;
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[1].tag, EventKind::Error);
        assert_eq!(catalog.writes(), 0);
        assert_eq!(timer.delays().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_update_read_failure() {
        let (harness, catalog, timer) =
            harness(ScriptedCatalog::new(&[180, 20, 25], 40).failing_read(2));

        let outcome = assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);

        let failure = match outcome {
            RunOutcome::Failed(failure) => failure,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(failure.probe.as_deref(), Some(POST_UPDATE_READ));
        assert_eq!(harness.run_state().await, RunState::Failed);

        let tags: Vec<_> = harness.probe_results().await.iter().map(|p| p.tag).collect();
        assert_eq!(
            tags,
            vec![EventKind::Miss, EventKind::Hit, EventKind::Update, EventKind::Error]
        );
        assert_eq!(catalog.writes(), 1);
        assert_eq!(timer.delays().len(), 3);
        assert_eq!(harness.metrics().await, Metrics::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_target_keeps_previous_results() {
        let (harness, _, _) = harness(ScriptedCatalog::new(&[180, 20, 25], 40));
        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);
        let metrics = harness.metrics().await;

        let result = harness.start_run("ttl", None).await;

        assert_eq!(result, Err(HarnessError::NoTargetResource));
        assert_eq!(harness.probe_results().await.len(), 4);
        assert_eq!(harness.tally().await.hits, 2);
        assert_eq!(harness.metrics().await, metrics);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_settle_windows() {
        let (harness, _, timer) = harness(ScriptedCatalog::new(&[180, 20, 25, 180, 20, 25], 40));
        let harness = harness.settle_windows(SettleWindows {
            guarantee: Duration::from_millis(5000),
            best_effort: Duration::from_millis(200),
        });

        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);
        assert_ok!(harness.start_run("ttl", Some("p1")).await);

        let delays = timer.delays();
        assert_eq!(delays[2], Duration::from_millis(5000));
        assert_eq!(delays[5], Duration::from_millis(200));

        let descriptors = harness.scenarios();
        assert_eq!(descriptors[2].settle_window_ms, 5000);
        assert_eq!(descriptors[1].settle_window_ms, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_narrative_follows_run() {
        let (harness, _, _) = harness(ScriptedCatalog::new(&[180, 20, 25, 180, 20, 25], 40));

        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);
        let first: Vec<_> = harness.narrative().await.into_iter().map(|e| e.message).collect();
        assert!(first[0].starts_with("Starting TTL + Event Invalidation test"));
        assert!(first.contains(&"Update applied: version 1 -> 2".to_string()));
        assert!(first.contains(&"Waiting 3000ms for cache invalidation".to_string()));
        assert!(first.last().unwrap().starts_with("Test completed"));

        // a new run starts from an empty narrative
        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);
        assert_eq!(harness.narrative().await.len(), first.len());
    }

    #[tokio::test]
    async fn test_unknown_scenario_leaves_state_alone() {
        let (harness, _, _) = harness(ScriptedCatalog::new(&[180, 20, 25], 40));

        let result = harness.start_run("lru", Some("p1")).await;

        assert_eq!(result, Err(HarnessError::UnknownScenario("lru".into())));
        assert_eq!(harness.run_state().await, RunState::Idle);
        assert!(harness.event_log().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        // real (paused) timer so the run is still mid-protocol when we poke it
        let catalog = Arc::new(ScriptedCatalog::new(&[180, 20, 25], 40));
        let harness = Harness::with_timer(catalog, Arc::new(TokioTimer));

        let ticket = harness.begin("ttl", Some("p1")).await.unwrap().unwrap();
        let in_flight = harness.clone();
        let run = tokio::spawn(async move { in_flight.execute(ticket).await });

        // let the baseline probe land, then try to restart
        tokio::time::sleep(Duration::from_millis(500)).await;
        let before = harness.probe_results().await;
        assert_eq!(before.len(), 1);

        let outcome = harness.start_run("ttl_invalidate", Some("other")).await.unwrap();
        assert_eq!(outcome, RunOutcome::AlreadyRunning);
        assert_eq!(harness.probe_results().await, before);
        assert_eq!(harness.run_info().await.target_id.as_deref(), Some("p1"));

        assert!(matches!(run.await.unwrap(), RunOutcome::Completed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_run_clears_probes_but_not_log() {
        let (harness, _, _) = harness(ScriptedCatalog::new(&[180, 20, 25, 180, 20, 25], 40));

        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);
        assert_ok!(harness.start_run("ttl_invalidate", Some("p1")).await);

        assert_eq!(harness.probe_results().await.len(), 4);
        // 5 events per run, capped at 10
        assert_eq!(harness.event_log().await.len(), 10);
    }

    #[test]
    fn test_next_update_delta() {
        let baseline = ProbeResult::success(
            BASELINE_READ,
            crate::harness::ProbeKind::Read,
            1,
            crate::catalog::ProductRecord {
                price: Some(10.1),
                stock: Some(7),
                ..Default::default()
            },
        );
        let update = next_update(&baseline);
        assert_eq!(update.price, 20.1);
        assert_eq!(update.stock, 12);
    }

    #[test]
    fn test_guarantee_scenario_has_longest_window() {
        let windows = SettleWindows::default();
        let guarantee = Scenario::ALL
            .into_iter()
            .find(|s| s.expected_freshness() == FreshnessExpectation::Guarantee)
            .unwrap();
        assert!(Scenario::ALL
            .into_iter()
            .all(|s| windows.for_scenario(s) <= windows.for_scenario(guarantee)));
    }
}
