//! Out-of-band proxy maintenance.
//!
//! Fetches candidate lists from public sources, validates each candidate
//! concurrently over a bounded worker pool, and upserts survivors into the
//! proxy store. Runs on its own cadence and never touches the per-query
//! search path.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::fetcher::random_user_agent;
use crate::proxy::{ProxyCandidate, ProxyProtocol, ProxyRecord};
use crate::store::ProxyStore;
use crate::{Result, SearchError};

const FREE_PROXY_LIST_URL: &str = "https://free-proxy-list.net/";
const GEONODE_URL: &str =
    "https://proxylist.geonode.com/api/proxy-list?limit=100&page=1&sort_by=lastChecked&sort_type=desc";
const DEFAULT_PROBE_URL: &str = "https://www.google.com";

/// One public list of proxy candidates.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Fetches the raw candidate list.
    async fn fetch(&self) -> Result<Vec<ProxyCandidate>>;
}

/// Scrapes the proxy table on free-proxy-list.net.
pub struct FreeProxyList {
    client: Client,
    timeout: Duration,
}

impl FreeProxyList {
    /// Creates a source with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    fn parse_table(html: &str) -> Result<Vec<ProxyCandidate>> {
        let document = Html::parse_document(html);

        let table_selector = Selector::parse("table")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let row_selector = Selector::parse("tr")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let cell_selector = Selector::parse("td")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

        let Some(table) = document.select(&table_selector).next() else {
            warn!("no proxy table found on free-proxy-list.net");
            return Ok(Vec::new());
        };

        let mut candidates = Vec::new();
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();

            // Header rows have no cells; data rows carry at least 8 columns.
            if cells.len() < 8 {
                continue;
            }
            let Ok(port) = cells[1].parse::<u16>() else {
                continue;
            };

            let protocol = if cells[6] == "yes" {
                ProxyProtocol::Https
            } else {
                ProxyProtocol::Http
            };
            candidates.push(ProxyCandidate::new(cells[0].clone(), port).with_protocol(protocol));
        }

        Ok(candidates)
    }
}

#[async_trait]
impl ProxySource for FreeProxyList {
    fn name(&self) -> &'static str {
        "free-proxy-list.net"
    }

    async fn fetch(&self) -> Result<Vec<ProxyCandidate>> {
        let response = self
            .client
            .get(FREE_PROXY_LIST_URL)
            .header(USER_AGENT, random_user_agent())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        Self::parse_table(&html)
    }
}

/// Reads the geonode proxy list API.
pub struct Geonode {
    client: Client,
    timeout: Duration,
}

impl Geonode {
    /// Creates a source with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    fn parse_payload(payload: &serde_json::Value) -> Vec<ProxyCandidate> {
        let Some(entries) = payload.get("data").and_then(|data| data.as_array()) else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let Some(ip) = entry.get("ip").and_then(|ip| ip.as_str()) else {
                continue;
            };
            // The API serves ports as strings; tolerate numbers too.
            let port = match entry.get("port") {
                Some(serde_json::Value::String(s)) => s.parse::<u16>().ok(),
                Some(value) => value.as_u64().and_then(|p| u16::try_from(p).ok()),
                None => None,
            };
            let Some(port) = port else {
                continue;
            };

            let protocol = match entry
                .get("protocols")
                .and_then(|protocols| protocols.as_array())
                .and_then(|protocols| protocols.first())
                .and_then(|protocol| protocol.as_str())
            {
                Some("https") => ProxyProtocol::Https,
                _ => ProxyProtocol::Http,
            };
            candidates.push(ProxyCandidate::new(ip, port).with_protocol(protocol));
        }

        candidates
    }
}

#[async_trait]
impl ProxySource for Geonode {
    fn name(&self) -> &'static str {
        "geonode.com"
    }

    async fn fetch(&self) -> Result<Vec<ProxyCandidate>> {
        let response = self
            .client
            .get(GEONODE_URL)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let payload: serde_json::Value = response.json().await?;
        Ok(Self::parse_payload(&payload))
    }
}

/// Checks whether one candidate actually relays traffic.
#[async_trait]
pub trait ProxyValidator: Send + Sync {
    /// Returns whether the candidate passed validation.
    async fn validate(&self, candidate: &ProxyCandidate) -> bool;
}

/// Validates a candidate with one real GET through it against a probe URL.
///
/// Only HTTP 200 passes; any other status or transport error discards the
/// candidate.
pub struct HttpProxyValidator {
    probe_url: String,
    timeout: Duration,
}

impl HttpProxyValidator {
    /// Creates a validator with the default probe URL.
    pub fn new(timeout: Duration) -> Self {
        Self {
            probe_url: DEFAULT_PROBE_URL.to_string(),
            timeout,
        }
    }

    /// Overrides the probe URL.
    pub fn with_probe_url(mut self, url: impl Into<String>) -> Self {
        self.probe_url = url.into();
        self
    }
}

#[async_trait]
impl ProxyValidator for HttpProxyValidator {
    async fn validate(&self, candidate: &ProxyCandidate) -> bool {
        let proxy = match reqwest::Proxy::all(candidate.address()) {
            Ok(proxy) => proxy,
            Err(_) => return false,
        };
        let client = match Client::builder().proxy(proxy).timeout(self.timeout).build() {
            Ok(client) => client,
            Err(_) => return false,
        };

        match client
            .get(&self.probe_url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(_) => false,
        }
    }
}

/// Batch job: fetch candidates, validate them, store the survivors.
pub struct ProxyMaintenance {
    sources: Vec<Arc<dyn ProxySource>>,
    validator: Arc<dyn ProxyValidator>,
    store: Arc<dyn ProxyStore>,
    workers: usize,
}

impl ProxyMaintenance {
    /// Creates a job over the given sources and validator.
    pub fn new(
        sources: Vec<Arc<dyn ProxySource>>,
        validator: Arc<dyn ProxyValidator>,
        store: Arc<dyn ProxyStore>,
        workers: usize,
    ) -> Self {
        Self {
            sources,
            validator,
            store,
            workers: workers.max(1),
        }
    }

    /// Creates a job over the two stock public sources.
    pub fn with_default_sources(config: &SearchConfig, store: Arc<dyn ProxyStore>) -> Self {
        let timeout = config.probe_timeout();
        Self::new(
            vec![
                Arc::new(FreeProxyList::new(timeout)),
                Arc::new(Geonode::new(timeout)),
            ],
            Arc::new(HttpProxyValidator::new(timeout)),
            store,
            config.validation_workers,
        )
    }

    /// Refreshes the store and returns the number of proxies stored.
    ///
    /// A source failure degrades to an empty contribution from that source.
    /// Every validated candidate is upserted with `is_active = true` and a
    /// reset success rate; each run is a fresh snapshot.
    pub async fn refresh(&self) -> Result<usize> {
        let mut candidates = Vec::new();
        for source in &self.sources {
            match source.fetch().await {
                Ok(mut list) => {
                    debug!(source = source.name(), count = list.len(), "fetched proxy candidates");
                    candidates.append(&mut list);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "proxy source failed");
                }
            }
        }

        let validator = &self.validator;
        let valid: Vec<ProxyCandidate> = stream::iter(candidates)
            .map(|candidate| async move {
                let ok = validator.validate(&candidate).await;
                ok.then_some(candidate)
            })
            .buffer_unordered(self.workers)
            .filter_map(|candidate| async move { candidate })
            .collect()
            .await;

        for candidate in &valid {
            self.store
                .upsert(ProxyRecord::from_candidate(candidate.clone()))
                .await?;
        }

        info!(count = valid.len(), "proxy refresh complete");
        Ok(valid.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProxyStore;

    struct StaticSource {
        candidates: Vec<ProxyCandidate>,
    }

    #[async_trait]
    impl ProxySource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self) -> Result<Vec<ProxyCandidate>> {
            Ok(self.candidates.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProxySource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self) -> Result<Vec<ProxyCandidate>> {
            Err(SearchError::Other("source unreachable".to_string()))
        }
    }

    /// Accepts candidates whose port is in the allow list.
    struct PortAllowlistValidator {
        ports: Vec<u16>,
    }

    #[async_trait]
    impl ProxyValidator for PortAllowlistValidator {
        async fn validate(&self, candidate: &ProxyCandidate) -> bool {
            self.ports.contains(&candidate.port)
        }
    }

    fn candidates(ports: &[u16]) -> Vec<ProxyCandidate> {
        ports
            .iter()
            .map(|&port| ProxyCandidate::new(format!("10.0.0.{}", port % 250), port))
            .collect()
    }

    #[test]
    fn test_parse_table_no_table_yields_empty() {
        let html = "<html><body><p>maintenance</p></body></html>";
        let result = FreeProxyList::parse_table(html).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_table_extracts_rows() {
        let html = r#"
            <table>
                <tr><th>IP</th><th>Port</th><th>Code</th><th>Country</th><th>Anonymity</th><th>Google</th><th>Https</th><th>Last Checked</th></tr>
                <tr><td>51.15.4.1</td><td>8080</td><td>FR</td><td>France</td><td>anonymous</td><td>no</td><td>yes</td><td>1 min ago</td></tr>
                <tr><td>88.99.2.3</td><td>3128</td><td>DE</td><td>Germany</td><td>elite</td><td>no</td><td>no</td><td>2 min ago</td></tr>
            </table>
        "#;
        let result = FreeProxyList::parse_table(html).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].ip, "51.15.4.1");
        assert_eq!(result[0].port, 8080);
        assert_eq!(result[0].protocol, ProxyProtocol::Https);
        assert_eq!(result[1].protocol, ProxyProtocol::Http);
    }

    #[test]
    fn test_parse_table_skips_bad_port() {
        let html = r#"
            <table>
                <tr><td>51.15.4.1</td><td>not-a-port</td><td>FR</td><td>France</td><td>anonymous</td><td>no</td><td>yes</td><td>now</td></tr>
            </table>
        "#;
        let result = FreeProxyList::parse_table(html).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_geonode_payload() {
        let payload = serde_json::json!({
            "data": [
                {"ip": "51.15.4.1", "port": "8080", "protocols": ["https"]},
                {"ip": "88.99.2.3", "port": 3128, "protocols": ["http"]},
                {"ip": "1.2.3.4"},
                {"port": "1080"}
            ]
        });
        let result = Geonode::parse_payload(&payload);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].port, 8080);
        assert_eq!(result[0].protocol, ProxyProtocol::Https);
        assert_eq!(result[1].port, 3128);
        assert_eq!(result[1].protocol, ProxyProtocol::Http);
    }

    #[test]
    fn test_parse_geonode_payload_missing_data() {
        let payload = serde_json::json!({"message": "rate limited"});
        assert!(Geonode::parse_payload(&payload).is_empty());
    }

    #[tokio::test]
    async fn test_refresh_stores_only_validated_candidates() {
        // Two sources of 5 and 3 candidates; validation accepts 4 in total.
        let store = Arc::new(MemoryProxyStore::new());
        let job = ProxyMaintenance::new(
            vec![
                Arc::new(StaticSource {
                    candidates: candidates(&[8001, 8002, 8003, 8004, 8005]),
                }),
                Arc::new(StaticSource {
                    candidates: candidates(&[9001, 9002, 9003]),
                }),
            ],
            Arc::new(PortAllowlistValidator {
                ports: vec![8001, 8003, 9001, 9003],
            }),
            store.clone(),
            10,
        );

        let count = job.refresh().await.unwrap();
        assert_eq!(count, 4);
        assert_eq!(store.len().await, 4);

        for record in store.records().await {
            assert!(record.is_active);
            assert_eq!(record.success_rate, 100.0);
        }
    }

    #[tokio::test]
    async fn test_refresh_survives_source_failure() {
        let store = Arc::new(MemoryProxyStore::new());
        let job = ProxyMaintenance::new(
            vec![
                Arc::new(FailingSource),
                Arc::new(StaticSource {
                    candidates: candidates(&[8001, 8002]),
                }),
            ],
            Arc::new(PortAllowlistValidator {
                ports: vec![8001, 8002],
            }),
            store.clone(),
            10,
        );

        let count = job.refresh().await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_refresh_with_no_candidates() {
        let store = Arc::new(MemoryProxyStore::new());
        let job = ProxyMaintenance::new(
            vec![Arc::new(StaticSource { candidates: vec![] })],
            Arc::new(PortAllowlistValidator { ports: vec![] }),
            store.clone(),
            10,
        );

        let count = job.refresh().await.unwrap();
        assert_eq!(count, 0);
        assert!(store.is_empty().await);
    }
}
