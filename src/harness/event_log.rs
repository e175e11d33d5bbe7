//! Event Log Module
//!
//! Bounded, ordered record of classified events, kept across runs.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of events retained by the log.
pub const EVENT_LOG_CAPACITY: usize = 10;

// == Event Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Miss,
    Hit,
    Update,
    Invalidation,
    Fresh,
    Stale,
    Error,
}

impl EventKind {
    /// Hit and miss are the only kinds that count toward the hit rate.
    pub fn is_cache_outcome(self) -> bool {
        matches!(self, EventKind::Hit | EventKind::Miss)
    }
}

// == Classified Event ==
/// An immutable, timestamped log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedEvent {
    pub kind: EventKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl ClassifiedEvent {
    pub fn new(kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

// == Event Log ==
/// Fixed-capacity FIFO: the oldest entry is evicted on overflow.
///
/// Front = oldest, back = newest.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<ClassifiedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    // == Append ==
    pub fn append(&mut self, event: ClassifiedEvent) {
        if self.capacity == 0 {
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // == List ==
    /// Events oldest first.
    pub fn list(&self) -> Vec<ClassifiedEvent> {
        self.events.iter().cloned().collect()
    }

}
