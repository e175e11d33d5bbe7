//! Metrics Aggregator
//!
//! Summary statistics derived from a completed run's tagged probes.

use serde::Serialize;

use super::event_log::EventKind;
use super::probe::{ProbeKind, TaggedProbe};

// == Metrics ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Mean latency of the read probes, rounded to the millisecond
    pub avg_latency_ms: u64,
    /// hits / (hits + misses) as a rounded percentage
    pub cache_hit_rate_percent: u64,
    pub stale_data_detected: bool,
}

// == Compute ==
/// Recomputes metrics from scratch. Pure: same input, same output.
///
/// Write probes are left out of the latency mean, and only `Hit`/`Miss`
/// tags count toward the hit rate.
pub fn compute(probes: &[TaggedProbe]) -> Metrics {
    let read_latencies: Vec<u64> = probes
        .iter()
        .filter(|p| p.result.kind == ProbeKind::Read)
        .map(|p| p.result.latency_ms)
        .collect();

    let avg_latency_ms = if read_latencies.is_empty() {
        0
    } else {
        let total: u64 = read_latencies.iter().sum();
        (total as f64 / read_latencies.len() as f64).round() as u64
    };

    let (hits, counted) = probes
        .iter()
        .filter(|p| p.tag.is_cache_outcome())
        .fold((0u64, 0u64), |(hits, counted), p| {
            (hits + u64::from(p.tag == EventKind::Hit), counted + 1)
        });
    let cache_hit_rate_percent = hit_rate_percent(hits, counted - hits);

    Metrics {
        avg_latency_ms,
        cache_hit_rate_percent,
        stale_data_detected: probes.iter().any(|p| p.tag == EventKind::Stale),
    }
}

/// Rounded percentage of hits; 0 when nothing was counted.
pub fn hit_rate_percent(hits: u64, misses: u64) -> u64 {
    let total = hits + misses;
    if total == 0 {
        0
    } else {
        (hits as f64 / total as f64 * 100.0).round() as u64
    }
}
