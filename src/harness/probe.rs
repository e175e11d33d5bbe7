//! Probe Executor
//!
//! Performs one timed request/response cycle against the catalog.

use std::sync::Arc;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::classifier::Freshness;
use super::event_log::EventKind;
use crate::catalog::{CacheSignal, Catalog, ProductRecord, ProductUpdate};

// == Probe Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Read,
    Write,
}

/// What a probe sends to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeRequest {
    Read,
    Write(ProductUpdate),
}

impl ProbeRequest {
    pub fn kind(&self) -> ProbeKind {
        match self {
            ProbeRequest::Read => ProbeKind::Read,
            ProbeRequest::Write(_) => ProbeKind::Write,
        }
    }
}

// == Probe Result ==
/// Outcome of a single probe. Latency is measured even on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub label: String,
    pub kind: ProbeKind,
    pub latency_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ProductRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Cache outcome reported by the catalog, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_signal: Option<CacheSignal>,
}

impl ProbeResult {
    pub fn success(
        label: impl Into<String>,
        kind: ProbeKind,
        latency_ms: u64,
        payload: ProductRecord,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            latency_ms,
            success: true,
            payload: Some(payload),
            error: None,
            cache_signal: None,
        }
    }

    pub fn failure(
        label: impl Into<String>,
        kind: ProbeKind,
        latency_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            latency_ms,
            success: false,
            payload: None,
            error: Some(error.into()),
            cache_signal: None,
        }
    }

    pub fn with_cache_signal(mut self, signal: Option<CacheSignal>) -> Self {
        self.cache_signal = signal;
        self
    }

    pub fn version(&self) -> Option<i64> {
        self.payload.as_ref().and_then(|p| p.version)
    }

    pub fn price(&self) -> Option<f64> {
        self.payload.as_ref().and_then(|p| p.price)
    }

    pub fn stock(&self) -> Option<i64> {
        self.payload.as_ref().and_then(|p| p.stock)
    }
}

// == Tagged Probe ==
/// A probe result together with the event kind it was classified as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedProbe {
    #[serde(flatten)]
    pub result: ProbeResult,
    pub tag: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Freshness>,
}

impl TaggedProbe {
    pub fn new(result: ProbeResult, tag: EventKind) -> Self {
        Self {
            result,
            tag,
            freshness: None,
        }
    }

    pub fn with_freshness(mut self, freshness: Option<Freshness>) -> Self {
        self.freshness = freshness;
        self
    }
}

// == Probe Executor ==
/// Issues probes against a catalog. One attempt per call, no retries.
#[derive(Clone)]
pub struct ProbeExecutor {
    catalog: Arc<dyn Catalog>,
}

impl ProbeExecutor {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Runs one probe and measures its wall-clock duration.
    pub async fn execute(&self, label: &str, request: &ProbeRequest, target_id: &str) -> ProbeResult {
        let kind = request.kind();
        let started = Instant::now();

        let outcome = match request {
            ProbeRequest::Read => self.catalog.read_product(target_id).await,
            ProbeRequest::Write(update) => self.catalog.update_product(target_id, update).await,
        };

        let latency_ms = elapsed_ms(started);

        match outcome {
            Ok(response) => {
                debug!("{}: {}ms version={:?}", label, latency_ms, response.product.version);
                ProbeResult::success(label, kind, latency_ms, response.product)
                    .with_cache_signal(response.cache_signal)
            }
            Err(err) => {
                warn!("{} failed after {}ms: {}", label, latency_ms, err);
                ProbeResult::failure(label, kind, latency_ms, err.to_string())
            }
        }
    }
}

/// Elapsed time rounded to the nearest millisecond.
fn elapsed_ms(started: Instant) -> u64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() as u64
}
