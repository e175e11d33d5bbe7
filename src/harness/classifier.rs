//! State Classifier
//!
//! Infers a cache outcome for a probe from indirect signals.
//!
//! The latency rule is a heuristic, not ground truth: a probe counts as a hit
//! when it is strictly faster than 80% of the baseline latency, so network
//! jitter can flip the result either way. When the catalog reports its own
//! cache status on the response, that report is used instead.

use serde::Serialize;

use super::event_log::{ClassifiedEvent, EventKind};
use super::probe::ProbeResult;
use super::scenario::{FreshnessExpectation, Scenario};
use crate::catalog::CacheSignal;

/// Hit threshold as a ratio of the baseline latency (4/5 = 0.8).
const HIT_RATIO_NUM: u64 = 4;
const HIT_RATIO_DEN: u64 = 5;

// == Write Context ==
/// What the write probe established, used to judge the read that follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteContext {
    /// Version the catalog returned for the write
    pub expected_version: Option<i64>,
    /// Price that was written
    pub written_price: f64,
}

impl WriteContext {
    pub fn from_write(write: &ProbeResult, written_price: f64) -> Self {
        Self {
            expected_version: write.version(),
            written_price,
        }
    }
}

// == Freshness ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Stale,
    /// Payload did not allow a verdict either way
    Indeterminate,
}

/// Where a hit/miss verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Latency comparison against the baseline
    Latency,
    /// Cache status reported by the catalog
    Reported,
    /// First probe of a run, no comparison possible
    Baseline,
}

// == Classification ==
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: EventKind,
    pub basis: Basis,
    /// Only set for the read that follows a write
    pub freshness: Option<Freshness>,
    pub description: String,
}

impl Classification {
    pub fn to_event(&self) -> ClassifiedEvent {
        ClassifiedEvent::new(self.kind, self.description.clone())
    }
}

// == Hit / Miss ==
/// Hit/miss verdict for `current` relative to `baseline`.
pub fn cache_outcome(current: &ProbeResult, baseline: Option<&ProbeResult>) -> (EventKind, Basis) {
    let Some(baseline) = baseline else {
        return (EventKind::Miss, Basis::Baseline);
    };

    if let Some(signal) = current.cache_signal {
        let kind = match signal {
            CacheSignal::Hit => EventKind::Hit,
            CacheSignal::Miss => EventKind::Miss,
        };
        return (kind, Basis::Reported);
    }

    if is_latency_hit(current.latency_ms, baseline.latency_ms) {
        (EventKind::Hit, Basis::Latency)
    } else {
        (EventKind::Miss, Basis::Latency)
    }
}

/// `current < baseline * 0.8`, in integer arithmetic so the boundary is exact.
pub fn is_latency_hit(current_ms: u64, baseline_ms: u64) -> bool {
    current_ms.saturating_mul(HIT_RATIO_DEN) < baseline_ms.saturating_mul(HIT_RATIO_NUM)
}

// == Freshness ==
/// Freshness of a post-write read. Missing fields degrade to `Indeterminate`.
pub fn freshness(
    current: &ProbeResult,
    baseline: Option<&ProbeResult>,
    write: &WriteContext,
) -> Freshness {
    let version = current.version();

    let version_matches = matches!((version, write.expected_version), (Some(a), Some(b)) if a == b);
    let price_matches = current
        .price()
        .map(|p| same_price(p, write.written_price))
        .unwrap_or(false);
    if version_matches && price_matches {
        return Freshness::Fresh;
    }

    let unchanged = matches!(
        (version, baseline.and_then(ProbeResult::version)),
        (Some(a), Some(b)) if a == b
    );
    if unchanged {
        return Freshness::Stale;
    }

    Freshness::Indeterminate
}

/// Prices are compared to the cent.
pub fn same_price(a: f64, b: f64) -> bool {
    (a * 100.0).round() == (b * 100.0).round()
}

// == Classify ==
/// Turns a probe into a semantic event.
///
/// `write` is only given for the read that follows the write probe; every
/// other read gets a plain hit/miss verdict.
pub fn classify(
    current: &ProbeResult,
    baseline: Option<&ProbeResult>,
    write: Option<&WriteContext>,
    scenario: Scenario,
) -> Classification {
    let (outcome, basis) = cache_outcome(current, baseline);
    let verdict = if outcome == EventKind::Hit { "hit" } else { "miss" };

    let Some(write) = write else {
        return Classification {
            kind: outcome,
            basis,
            freshness: None,
            description: format!("{} - cache {}", current.label, verdict),
        };
    };

    let freshness = freshness(current, baseline, write);
    let (kind, description) = match freshness {
        Freshness::Fresh => (
            EventKind::Fresh,
            format!(
                "Fresh data retrieved: ${:.2} (v{})",
                write.written_price,
                current.version().unwrap_or_default()
            ),
        ),
        Freshness::Stale => {
            let mut description = format!(
                "Stale data detected: still showing v{}",
                current.version().unwrap_or_default()
            );
            if scenario.expected_freshness() == FreshnessExpectation::Guarantee {
                description.push_str(&format!(" despite {} guarantee", scenario.name()));
            }
            (EventKind::Stale, description)
        }
        Freshness::Indeterminate => (
            outcome,
            format!("{} - cache {}, freshness unknown", current.label, verdict),
        ),
    };

    Classification {
        kind,
        basis,
        freshness: Some(freshness),
        description,
    }
}
