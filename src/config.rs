//! Runtime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the search engine and the proxy maintenance job.
///
/// Passed explicitly at construction; there is no ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether result-bearing outcomes are written to the search store.
    #[serde(default = "default_persist")]
    pub persist_results: bool,
    /// Whether fetches should go through the proxy selector.
    ///
    /// Off in this build: no rotating selector ships, so all egress uses
    /// the direct connection path regardless. The field is the wiring
    /// point for a future selector implementation.
    #[serde(default)]
    pub use_proxies: bool,
    /// Timeout for one engine page fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Timeout for the best-effort public IP lookup, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub ip_lookup_timeout_secs: u64,
    /// Timeout for one proxy validation probe, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Worker pool width for the batch proxy validation job.
    #[serde(default = "default_workers")]
    pub validation_workers: usize,
}

fn default_persist() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    20
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_workers() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            persist_results: true,
            use_proxies: false,
            fetch_timeout_secs: 20,
            ip_lookup_timeout_secs: 10,
            probe_timeout_secs: 10,
            validation_workers: 10,
        }
    }
}

impl SearchConfig {
    /// Returns the page fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Returns the public IP lookup timeout as a [`Duration`].
    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_lookup_timeout_secs)
    }

    /// Returns the proxy probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SearchConfig::default();
        assert!(config.persist_results);
        assert!(!config.use_proxies);
        assert_eq!(config.fetch_timeout_secs, 20);
        assert_eq!(config.ip_lookup_timeout_secs, 10);
        assert_eq!(config.probe_timeout_secs, 10);
        assert_eq!(config.validation_workers, 10);
    }

    #[test]
    fn test_config_durations() {
        let config = SearchConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(config.ip_lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert!(config.persist_results);
        assert!(!config.use_proxies);
        assert_eq!(config.validation_workers, 10);
    }

    #[test]
    fn test_config_deserialization_overrides() {
        let json = r#"{"persist_results":false,"fetch_timeout_secs":5}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert!(!config.persist_results);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.probe_timeout_secs, 10); // default
    }
}
