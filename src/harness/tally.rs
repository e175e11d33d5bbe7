//! Live Tally Module
//!
//! Running counters for the run in progress: hits, misses, invalidations and
//! the last product snapshot seen.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metrics::hit_rate_percent;
use crate::catalog::ProductRecord;

// == Live Tally ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveTally {
    /// Reads judged as cache hits
    pub hits: u64,
    /// Reads judged as cache misses
    pub misses: u64,
    /// Invalidation events emitted after writes
    pub invalidations: u64,
    /// Last product payload observed
    pub current_product: Option<ProductRecord>,
    pub last_update: Option<DateTime<Utc>>,
}

impl LiveTally {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Rounded hit percentage, or 0 if no reads have been judged.
    pub fn hit_rate_percent(&self) -> u64 {
        hit_rate_percent(self.hits, self.misses)
    }

    // == Record Hit ==
    pub fn record_hit(&mut self, product: Option<&ProductRecord>) {
        self.hits += 1;
        self.observe(product);
    }

    // == Record Miss ==
    pub fn record_miss(&mut self, product: Option<&ProductRecord>) {
        self.misses += 1;
        self.observe(product);
    }

    // == Record Invalidation ==
    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
        self.last_update = Some(Utc::now());
    }

    fn observe(&mut self, product: Option<&ProductRecord>) {
        if let Some(product) = product {
            self.current_product = Some(product.clone());
        }
        self.last_update = Some(Utc::now());
    }
}
