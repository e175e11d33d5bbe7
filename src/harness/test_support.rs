//! Scripted collaborators for harness unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::timer::Timer;
use crate::catalog::{Catalog, CatalogResponse, ProductRecord, ProductUpdate};
use crate::error::{HarnessError, Result};

/// In-memory catalog with scripted read latencies.
pub struct ScriptedCatalog {
    inner: Mutex<Inner>,
    write_latency: Duration,
    stale: bool,
    fail_writes: bool,
    fail_read: Option<usize>,
}

struct Inner {
    product: ProductRecord,
    initial: ProductRecord,
    latencies: VecDeque<u64>,
    reads: usize,
    writes: usize,
}

impl ScriptedCatalog {
    /// Reads take the given latencies in order (0 once exhausted).
    pub fn new(read_latencies_ms: &[u64], write_latency_ms: u64) -> Self {
        let product = ProductRecord {
            id: Some("p1".to_string()),
            name: Some("Test Lamp".to_string()),
            price: Some(10.0),
            stock: Some(100),
            version: Some(1),
        };
        Self {
            inner: Mutex::new(Inner {
                initial: product.clone(),
                product,
                latencies: read_latencies_ms.iter().copied().collect(),
                reads: 0,
                writes: 0,
            }),
            write_latency: Duration::from_millis(write_latency_ms),
            stale: false,
            fail_writes: false,
            fail_read: None,
        }
    }

    /// Reads keep returning the product as it was before any write.
    pub fn serving_stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// The read with this zero-based index fails.
    pub fn failing_read(mut self, index: usize) -> Self {
        self.fail_read = Some(index);
        self
    }

    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn read_product(&self, _id: &str) -> Result<CatalogResponse> {
        let (latency, index, snapshot) = {
            let mut inner = self.inner.lock().unwrap();
            let latency = inner.latencies.pop_front().unwrap_or(0);
            let index = inner.reads;
            inner.reads += 1;
            let snapshot = if self.stale {
                inner.initial.clone()
            } else {
                inner.product.clone()
            };
            (latency, index, snapshot)
        };

        tokio::time::sleep(Duration::from_millis(latency)).await;

        if self.fail_read == Some(index) {
            return Err(HarnessError::Network("HTTP 503: Service Unavailable".into()));
        }
        Ok(CatalogResponse::new(snapshot))
    }

    async fn update_product(&self, _id: &str, update: &ProductUpdate) -> Result<CatalogResponse> {
        self.inner.lock().unwrap().writes += 1;
        tokio::time::sleep(self.write_latency).await;

        if self.fail_writes {
            return Err(HarnessError::Network("HTTP 500: Internal Server Error".into()));
        }

        let mut inner = self.inner.lock().unwrap();
        inner.product.price = Some(update.price);
        inner.product.stock = Some(update.stock);
        inner.product.version = inner.product.version.map(|v| v + 1);
        Ok(CatalogResponse::new(inner.product.clone()))
    }

    async fn first_product(&self) -> Result<Option<ProductRecord>> {
        Ok(Some(self.inner.lock().unwrap().product.clone()))
    }
}

/// Timer that records requested delays and returns at once.
#[derive(Default)]
pub struct RecordingTimer {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
