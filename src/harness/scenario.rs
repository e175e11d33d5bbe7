//! Scenario Registry
//!
//! The fixed set of caching strategies the harness knows how to verify.

use std::time::Duration;

use serde::Serialize;

use crate::error::{HarnessError, Result};

// == Freshness Expectation ==
/// What a scenario promises about reads that follow a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FreshnessExpectation {
    /// Reads after the settle window must observe the write
    Guarantee,
    /// Reads usually observe the write but may be stale until TTL expiry
    BestEffort,
    /// No caching, so no freshness claim is made
    None,
}

// == Scenario ==
/// A caching strategy under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Every request goes to the database
    #[serde(rename = "none")]
    NoCache,
    /// Cache with TTL, no invalidation
    Ttl,
    /// Cache with TTL plus event-driven invalidation
    TtlInvalidate,
}

impl Scenario {
    /// All scenarios, in display order.
    pub const ALL: [Scenario; 3] = [Scenario::NoCache, Scenario::Ttl, Scenario::TtlInvalidate];

    // == Lookup ==
    /// Looks a scenario up by its id (`none`, `ttl`, `ttl_invalidate`).
    pub fn get(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| HarnessError::UnknownScenario(id.to_string()))
    }

    pub fn id(self) -> &'static str {
        match self {
            Scenario::NoCache => "none",
            Scenario::Ttl => "ttl",
            Scenario::TtlInvalidate => "ttl_invalidate",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::NoCache => "No Cache",
            Scenario::Ttl => "TTL-Only Cache",
            Scenario::TtlInvalidate => "TTL + Event Invalidation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::NoCache => "All requests go directly to the database",
            Scenario::Ttl => "Cache with TTL, no invalidation",
            Scenario::TtlInvalidate => "Cache with TTL and event-driven invalidation on write",
        }
    }

    /// Outcome an operator should expect to see.
    pub fn expected(self) -> &'static str {
        match self {
            Scenario::NoCache => "High latency, no cache benefits",
            Scenario::Ttl => "Low latency, possible stale data",
            Scenario::TtlInvalidate => "Low latency, fresh data guaranteed",
        }
    }

    pub fn expected_freshness(self) -> FreshnessExpectation {
        match self {
            Scenario::NoCache => FreshnessExpectation::None,
            Scenario::Ttl => FreshnessExpectation::BestEffort,
            Scenario::TtlInvalidate => FreshnessExpectation::Guarantee,
        }
    }

    /// Whether a successful write should be followed by an invalidation event.
    pub fn emits_invalidation(self) -> bool {
        self.expected_freshness() == FreshnessExpectation::Guarantee
    }

    /// Descriptor reporting the settle window from `windows`.
    pub fn descriptor_with(self, windows: &SettleWindows) -> ScenarioDescriptor {
        ScenarioDescriptor {
            id: self.id(),
            name: self.name(),
            description: self.description(),
            expected: self.expected(),
            settle_window_ms: windows.for_scenario(self).as_millis() as u64,
            expected_freshness: self.expected_freshness(),
        }
    }
}

// == Settle Windows ==
/// Tunable settle windows, keyed by what a scenario promises.
///
/// Scenarios that guarantee freshness wait longer so the invalidation has
/// time to land before the post-update read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleWindows {
    pub guarantee: Duration,
    pub best_effort: Duration,
}

impl Default for SettleWindows {
    fn default() -> Self {
        Self {
            guarantee: Duration::from_millis(3000),
            best_effort: Duration::from_millis(1000),
        }
    }
}

impl SettleWindows {
    pub fn for_scenario(&self, scenario: Scenario) -> Duration {
        match scenario.expected_freshness() {
            FreshnessExpectation::Guarantee => self.guarantee,
            FreshnessExpectation::BestEffort | FreshnessExpectation::None => self.best_effort,
        }
    }
}

// == Scenario Descriptor ==
/// Flat, serializable view of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub expected: &'static str,
    pub settle_window_ms: u64,
    pub expected_freshness: FreshnessExpectation,
}
