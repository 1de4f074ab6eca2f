//! Bing search engine implementation.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::fetcher::Fetcher;
use crate::{Engine, EngineResponse, Result, SearchError, SearchResult};

const SEARCH_URL: &str = "https://www.bing.com/search";

/// Bing search engine.
pub struct Bing {
    fetcher: Arc<dyn Fetcher>,
}

impl Bing {
    /// Creates a new Bing engine backed by the given fetcher.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    fn parse_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        let container_selector = Selector::parse("li.b_algo")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let link_selector = Selector::parse("h2 a")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let snippet_selector = Selector::parse("div.b_caption p")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

        let mut results = Vec::new();

        for element in document.select(&container_selector) {
            let link = match element.select(&link_selector).next() {
                Some(el) => el,
                None => continue,
            };

            let title = link.text().collect::<String>().trim().to_string();
            let url = link.value().attr("href").unwrap_or_default().to_string();

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

#[async_trait]
impl Engine for Bing {
    fn id(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str) -> Result<EngineResponse> {
        let params = [("q", query.to_string()), ("count", "10".to_string())];
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
