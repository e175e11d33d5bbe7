//! Run Narrative
//!
//! Operator-facing notes on how the current run is progressing. Unlike the
//! event log this is cleared whenever a new run starts.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of notes retained for a run.
pub const NARRATIVE_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded list of notes, oldest first.
#[derive(Debug)]
pub struct RunNarrative {
    entries: VecDeque<NarrativeEntry>,
}

impl Default for RunNarrative {
    fn default() -> Self {
        Self::new()
    }
}

impl RunNarrative {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(NARRATIVE_CAPACITY),
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        if self.entries.len() == NARRATIVE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(NarrativeEntry {
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn entries(&self) -> Vec<NarrativeEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
