//! Multi-engine search orchestration.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::engine::Engine;
use crate::engines::{Bing, DuckDuckGo, Google};
use crate::fetcher::Fetcher;
use crate::fetcher_http::HttpFetcher;
use crate::result::{AggregateReport, EngineOutcome};
use crate::store::SearchStore;
use crate::{Result, SearchError, SearchQuery};

/// Fans one query out to multiple engines concurrently and reports one
/// outcome per engine.
///
/// Failures are contained at the engine-unit boundary: an error in one
/// unit lands in that engine's outcome and never disturbs its siblings or
/// aborts the aggregate call. No cross-engine precedence or merging is
/// applied — callers pick their own fallback order from the per-engine
/// buckets.
pub struct MultiEngineSearch {
    engines: Vec<Arc<dyn Engine>>,
    store: Option<Arc<dyn SearchStore>>,
    config: SearchConfig,
}

impl MultiEngineSearch {
    /// Creates an instance with no engines; add them with [`add_engine`].
    ///
    /// [`add_engine`]: MultiEngineSearch::add_engine
    pub fn new(config: SearchConfig) -> Self {
        Self {
            engines: Vec::new(),
            store: None,
            config,
        }
    }

    /// Creates an instance with the three stock engines sharing one fetcher.
    pub fn with_default_engines(config: SearchConfig) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config));
        let mut search = Self::new(config);
        search.add_engine(Google::new(Arc::clone(&fetcher)));
        search.add_engine(Bing::new(Arc::clone(&fetcher)));
        search.add_engine(DuckDuckGo::new(fetcher));
        search
    }

    /// Adds a search engine to the registry.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) {
        self.engines.push(Arc::new(engine));
    }

    /// Sets the persistence sink for result-bearing outcomes.
    pub fn set_store(&mut self, store: Arc<dyn SearchStore>) {
        self.store = Some(store);
    }

    /// Returns the number of registered engines.
    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Returns the ids of all registered engines.
    pub fn engine_ids(&self) -> Vec<&'static str> {
        self.engines.iter().map(|engine| engine.id()).collect()
    }

    /// Performs a search across the requested engines.
    ///
    /// Every requested, recognized engine gets exactly one outcome in the
    /// report, even on total failure. Unknown engine ids are dropped
    /// silently; an empty query or an empty selection is a request-level
    /// error.
    pub async fn search(&self, query: SearchQuery) -> Result<AggregateReport> {
        if query.query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".into()));
        }

        let selected = self.select_engines(&query);
        if selected.is_empty() {
            return Err(SearchError::NoEngines);
        }

        let start = Instant::now();
        debug!(query = %query.query, engines = selected.len(), "fanning out search");

        let futures: Vec<_> = selected
            .into_iter()
            .map(|engine| {
                let terms = query.query.clone();
                async move { self.run_engine(engine, &terms).await }
            })
            .collect();

        let mut report = AggregateReport::new(query.query);
        for outcome in join_all(futures).await {
            report.insert(outcome);
        }
        report.set_duration(start.elapsed().as_millis() as u64);

        Ok(report)
    }

    /// Runs one engine's unit of work, capturing any error into the outcome.
    async fn run_engine(&self, engine: Arc<dyn Engine>, query: &str) -> EngineOutcome {
        let id = engine.id();
        match engine.search(query).await {
            Ok(response) => {
                debug!(engine = id, results = response.results.len(), "engine completed");
                if response.results.is_empty() {
                    warn!(engine = id, query, "no results");
                }
                let mut outcome = EngineOutcome::new(id, response.results, response.egress);
                self.persist(&mut outcome, query).await;
                outcome
            }
            Err(e) => {
                warn!(engine = id, error = %e, "engine failed");
                EngineOutcome::failed(id, e.to_string())
            }
        }
    }

    /// Writes a result-bearing outcome to the store when persistence is on.
    ///
    /// A store failure is attached as an advisory note; the results are
    /// kept and the request still succeeds.
    async fn persist(&self, outcome: &mut EngineOutcome, query: &str) {
        if !self.config.persist_results || outcome.results.is_empty() {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store
            .save_search(query, &outcome.engine, &outcome.results)
            .await
        {
            warn!(engine = %outcome.engine, error = %e, "failed to save results");
            outcome.error = Some(format!("results found but not saved: {e}"));
        }
    }

    /// Selects engines for the request; unknown ids are dropped silently.
    fn select_engines(&self, query: &SearchQuery) -> Vec<Arc<dyn Engine>> {
        if query.engines.is_empty() {
            return self.engines.clone();
        }
        self.engines
            .iter()
            .filter(|engine| query.engines.iter().any(|id| id == engine.id()))
            .cloned()
            .collect()
    }
}
