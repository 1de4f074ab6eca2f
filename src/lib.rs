//! # fanout-search
//!
//! A multi-engine web search aggregation library.
//!
//! Fans one query out to several search engines concurrently, scrapes each
//! engine's response into a uniform result shape, and returns one outcome
//! per engine — results, egress identity, and any error — without merging
//! or ranking across engines. Callers consume the per-engine buckets and
//! apply their own fallback priority.
//!
//! An out-of-band maintenance job ([`ProxyMaintenance`]) keeps a store of
//! validated proxies; the per-query path carries the proxy selection seam
//! but runs direct-only in this configuration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fanout_search::{MultiEngineSearch, SearchConfig, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let search = MultiEngineSearch::with_default_engines(SearchConfig::default());
//!
//!     let query = SearchQuery::new("rust programming")
//!         .with_engines(vec!["google".to_string(), "duckduckgo".to_string()]);
//!     let report = search.search(query).await?;
//!
//!     for (engine, outcome) in report.outcomes() {
//!         println!("{engine}: {} results via {}", outcome.results.len(), outcome.egress);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod engine;
mod error;
mod fetcher;
mod fetcher_http;
mod maintenance;
mod proxy;
mod query;
mod result;
mod search;
mod store;

pub mod engines;

pub use config::SearchConfig;
pub use engine::{Engine, EngineResponse};
pub use error::{Result, SearchError};
pub use fetcher::{Fetched, Fetcher, IpResolver, random_user_agent};
pub use fetcher_http::{HttpFetcher, IpifyResolver};
pub use maintenance::{
    FreeProxyList, Geonode, HttpProxyValidator, ProxyMaintenance, ProxySource, ProxyValidator,
};
pub use proxy::{DirectOnly, ProxyCandidate, ProxyProtocol, ProxyRecord, ProxySelector};
pub use query::SearchQuery;
pub use result::{AggregateReport, EngineOutcome, SearchResult};
pub use search::MultiEngineSearch;
pub use store::{MemoryProxyStore, MemorySearchStore, ProxyStore, SavedSearch, SearchStore};
