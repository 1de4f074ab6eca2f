//! HTTP-based fetcher using reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::fetcher::{Fetched, Fetcher, IpResolver, random_user_agent};
use crate::proxy::{DirectOnly, ProxyRecord, ProxySelector};

/// Resolves the caller's public IP through api.ipify.org.
pub struct IpifyResolver {
    client: Client,
    timeout: Duration,
}

impl IpifyResolver {
    /// Creates a resolver with the given lookup timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl IpResolver for IpifyResolver {
    async fn public_ip(&self) -> Option<String> {
        let response = self
            .client
            .get("https://api.ipify.org?format=json")
            .timeout(self.timeout)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().await.ok()?;
        body.get("ip").and_then(|ip| ip.as_str()).map(str::to_string)
    }
}

/// A fetcher that uses plain HTTP requests via reqwest.
///
/// Every call picks a fresh random user-agent and reports the egress
/// identity that performed the request: `direct (<public-ip>)` on the
/// direct path, or the proxy address when the selector supplies one.
pub struct HttpFetcher {
    client: Client,
    resolver: Arc<dyn IpResolver>,
    proxies: Arc<dyn ProxySelector>,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the given configuration.
    pub fn new(config: &SearchConfig) -> Self {
        if config.use_proxies {
            warn!("use_proxies is set but no proxy selector ships in this build; using direct connections only");
        }
        Self {
            client: Client::new(),
            resolver: Arc::new(IpifyResolver::new(config.ip_lookup_timeout())),
            proxies: Arc::new(DirectOnly),
            timeout: config.fetch_timeout(),
        }
    }

    /// Replaces the public IP resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn IpResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the proxy selector.
    pub fn with_proxy_selector(mut self, proxies: Arc<dyn ProxySelector>) -> Self {
        self.proxies = proxies;
        self
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            "Upgrade-Insecure-Requests",
            HeaderValue::from_static("1"),
        );
        headers
    }

    async fn fetch_direct(&self, url: &str, params: &[(&str, String)]) -> Fetched {
        let ip = self
            .resolver
            .public_ip()
            .await
            .unwrap_or_else(|| "unknown".to_string());
        let egress = format!("direct ({ip})");
        debug!(url, egress = %egress, "making direct request");

        let body = self.send(&self.client, url, params).await;
        Fetched { body, egress }
    }

    async fn fetch_proxied(
        &self,
        url: &str,
        params: &[(&str, String)],
        record: ProxyRecord,
    ) -> Fetched {
        let egress = record.address();
        debug!(url, egress = %egress, "making proxied request");

        let client = match reqwest::Proxy::all(record.address())
            .and_then(|proxy| Client::builder().proxy(proxy).build())
        {
            Ok(client) => client,
            Err(e) => {
                warn!(egress = %egress, error = %e, "failed to build proxied client");
                self.proxies.report(&record, false).await;
                return Fetched { body: None, egress };
            }
        };

        let body = self.send(&client, url, params).await;
        self.proxies.report(&record, body.is_some()).await;
        Fetched { body, egress }
    }

    async fn send(&self, client: &Client, url: &str, params: &[(&str, String)]) -> Option<String> {
        let response = match client
            .get(url)
            .query(params)
            .headers(Self::browser_headers())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "request returned non-success status");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "failed to read response body");
                None
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Fetched {
        match self.proxies.pick().await {
            Some(record) => self.fetch_proxied(url, params, record).await,
            None => self.fetch_direct(url, params).await,
        }
    }
}
