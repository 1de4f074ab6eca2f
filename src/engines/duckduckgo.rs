//! DuckDuckGo search engine implementation.
//!
//! Uses the HTML endpoint, which serves server-rendered results and shows
//! the destination as display text rather than a link attribute.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::fetcher::Fetcher;
use crate::{Engine, EngineResponse, Result, SearchError, SearchResult};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html";

/// DuckDuckGo search engine.
pub struct DuckDuckGo {
    fetcher: Arc<dyn Fetcher>,
}

impl DuckDuckGo {
    /// Creates a new DuckDuckGo engine backed by the given fetcher.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    fn parse_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        let container_selector = Selector::parse(".result")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let title_selector = Selector::parse(".result__title")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let url_selector = Selector::parse(".result__url")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let snippet_selector = Selector::parse(".result__snippet")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

        let mut results = Vec::new();

        for element in document.select(&container_selector) {
            let title = match element.select(&title_selector).next() {
                Some(el) => el.text().collect::<String>().trim().to_string(),
                None => continue,
            };

            let url = match element.select(&url_selector).next() {
                Some(el) => ensure_scheme(el.text().collect::<String>().trim()),
                None => continue,
            };

            if title.is_empty() || url.is_empty() {
                continue;
            }

            let description = element
                .select(&snippet_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let rank = results.len() as u32 + 1;
            results.push(SearchResult::new(title, url, description, rank));
        }

        Ok(results)
    }
}

/// Prefixes `https://` when the extracted URL has no scheme.
fn ensure_scheme(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[async_trait]
impl Engine for DuckDuckGo {
    fn id(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<EngineResponse> {
        let params = [("q", query.to_string())];
        let fetched = self.fetcher.fetch(SEARCH_URL, &params).await;

        let results = match fetched.body {
            Some(html) => self.parse_results(&html)?,
            None => Vec::new(),
        };

        Ok(EngineResponse {
            results,
            egress: fetched.egress,
        })
    }
}
