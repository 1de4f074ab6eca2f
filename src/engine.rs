//! Search engine trait.

use async_trait::async_trait;

use crate::{Result, SearchResult};

/// What one engine produced for one query: parsed results plus the egress
/// identity that performed the fetch.
#[derive(Debug, Clone)]
pub struct EngineResponse {
    /// Parsed results in rank order (possibly empty).
    pub results: Vec<SearchResult>,
    /// Network identity that performed the fetch.
    pub egress: String,
}

/// Trait for implementing search engines.
///
/// A fetch that returns no body is an empty response, not an error:
/// `search` errs only on unexpected internal failures, and the aggregator
/// captures those per engine.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Stable identifier used to select this engine in a query.
    fn id(&self) -> &'static str;

    /// Performs a search and returns parsed results with egress identity.
    async fn search(&self, query: &str) -> Result<EngineResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_response_debug() {
        let response = EngineResponse {
            results: vec![SearchResult::new("t", "u", "d", 1)],
            egress: "direct (203.0.113.7)".to_string(),
        };
        let debug = format!("{:?}", response);
        assert!(debug.contains("203.0.113.7"));
    }
}
