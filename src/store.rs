//! Persistence seams for search provenance and proxy records.
//!
//! Storage is an external collaborator: this crate only writes to it. The
//! in-memory implementations here back tests and the CLI; an embedding
//! application supplies its own implementations for durable storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::proxy::ProxyRecord;
use crate::result::SearchResult;
use crate::Result;

/// Write-only sink for per-engine query/result rows.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Persists one query row plus one row per result, in rank order.
    async fn save_search(
        &self,
        query: &str,
        engine: &str,
        results: &[SearchResult],
    ) -> Result<()>;
}

/// Write-only sink for validated proxy records.
#[async_trait]
pub trait ProxyStore: Send + Sync {
    /// Inserts or refreshes a record under its (ip, port) key.
    async fn upsert(&self, record: ProxyRecord) -> Result<()>;
}

/// One saved search: the query row and its result rows.
#[derive(Debug, Clone)]
pub struct SavedSearch {
    /// The search terms.
    pub query: String,
    /// Engine that produced the results.
    pub engine: String,
    /// Result rows in rank order.
    pub results: Vec<SearchResult>,
}

/// In-memory search store.
#[derive(Default)]
pub struct MemorySearchStore {
    rows: RwLock<Vec<SavedSearch>>,
}

impl MemorySearchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of saved searches.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns whether nothing has been saved.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Returns a snapshot of everything saved so far.
    pub async fn saved(&self) -> Vec<SavedSearch> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl SearchStore for MemorySearchStore {
    async fn save_search(
        &self,
        query: &str,
        engine: &str,
        results: &[SearchResult],
    ) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.push(SavedSearch {
            query: query.to_string(),
            engine: engine.to_string(),
            results: results.to_vec(),
        });
        Ok(())
    }
}

/// In-memory proxy store keyed by (ip, port).
#[derive(Default)]
pub struct MemoryProxyStore {
    records: RwLock<HashMap<(String, u16), ProxyRecord>>,
}

impl MemoryProxyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Returns a snapshot of all stored records.
    pub async fn records(&self) -> Vec<ProxyRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ProxyStore for MemoryProxyStore {
    async fn upsert(&self, record: ProxyRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.key(), record);
        Ok(())
    }
}
