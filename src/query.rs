//! Search query representation.

use serde::{Deserialize, Serialize};

/// A search query with the engine subset to fan out to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms.
    pub query: String,
    /// Specific engines to use (by id). Empty means all registered engines.
    pub engines: Vec<String>,
}

impl SearchQuery {
    /// Creates a new search query with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            engines: Vec::new(),
        }
    }

    /// Restricts the query to specific engines.
    ///
    /// Ids that match no registered engine are dropped silently at
    /// dispatch time.
    pub fn with_engines(mut self, engines: Vec<String>) -> Self {
        self.engines = engines;
        self
    }
}
