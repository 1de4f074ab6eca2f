//! Search result and report types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single parsed search result from one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Result description/snippet; empty when the engine provides none.
    pub description: String,
    /// 1-based position within the owning engine's response.
    pub rank: u32,
}

impl SearchResult {
    /// Creates a new search result.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        rank: u32,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            rank,
        }
    }
}

/// Everything one engine produced for one query.
///
/// Exactly one outcome exists per requested, recognized engine — an engine
/// slot is never dropped, even on total failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutcome {
    /// Engine id.
    pub engine: String,
    /// Parsed results in the engine's own rank order (possibly empty).
    pub results: Vec<SearchResult>,
    /// Network identity that performed the fetch.
    pub egress: String,
    /// Advisory error; `None` for a clean (possibly empty) outcome.
    pub error: Option<String>,
}

impl EngineOutcome {
    /// Creates a clean outcome.
    pub fn new(
        engine: impl Into<String>,
        results: Vec<SearchResult>,
        egress: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            results,
            egress: egress.into(),
            error: None,
        }
    }

    /// Creates an outcome for an engine whose unit of work failed outright.
    pub fn failed(engine: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            results: Vec::new(),
            egress: "unknown".to_string(),
            error: Some(error.into()),
        }
    }

    /// Returns whether the outcome carries no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Per-engine result bundle for one aggregate query.
///
/// No cross-engine merging or precedence is applied; callers pick their own
/// fallback order from the per-engine buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// The search terms this report answers.
    pub query: String,
    outcomes: HashMap<String, EngineOutcome>,
    /// Search duration in milliseconds.
    pub duration_ms: u64,
}

impl AggregateReport {
    /// Creates an empty report for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            outcomes: HashMap::new(),
            duration_ms: 0,
        }
    }

    /// Inserts an engine's outcome under its id.
    pub fn insert(&mut self, outcome: EngineOutcome) {
        self.outcomes.insert(outcome.engine.clone(), outcome);
    }

    /// Returns one engine's outcome.
    pub fn outcome(&self, engine: &str) -> Option<&EngineOutcome> {
        self.outcomes.get(engine)
    }

    /// Returns all outcomes keyed by engine id.
    pub fn outcomes(&self) -> &HashMap<String, EngineOutcome> {
        &self.outcomes
    }

    /// Returns the ids of the engines present in the report.
    pub fn engine_ids(&self) -> Vec<&str> {
        self.outcomes.keys().map(String::as_str).collect()
    }

    /// Returns the total result count across all engines.
    pub fn total_results(&self) -> usize {
        self.outcomes.values().map(|o| o.results.len()).sum()
    }

    /// Sets the search duration.
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }
}
