//! Page fetcher abstraction and client identity helpers.

use async_trait::async_trait;
use rand::seq::SliceRandom;

/// Realistic browser user-agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
];

/// Selects a random user-agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}

/// Outcome of one fetch attempt.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Response body; absent on timeout, transport error, or non-2xx status.
    pub body: Option<String>,
    /// Network identity that performed the request.
    pub egress: String,
}

/// Trait for issuing one outbound GET with query parameters.
///
/// A failed fetch is reported as an absent body, not an error: scraped
/// sources drop out routinely, and the caller decides what an empty
/// response means.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the given URL with the given query parameters.
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Fetched;
}

/// Best-effort resolution of the caller's own public IP.
///
/// Injectable so tests can stub it; the production implementation makes a
/// network call and must never block the primary request path on failure.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Returns the public IP, or `None` when resolution fails.
    async fn public_ip(&self) -> Option<String>;
}
