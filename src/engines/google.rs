//! Google search engine implementation.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::fetcher::Fetcher;
use crate::{Engine, EngineResponse, Result, SearchError, SearchResult};

const SEARCH_URL: &str = "https://www.google.com/search";

/// Google search engine.
pub struct Google {
    fetcher: Arc<dyn Fetcher>,
}

impl Google {
    /// Creates a new Google engine backed by the given fetcher.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    fn parse_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        let container_selector = Selector::parse("div.g")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let title_selector = Selector::parse("h3")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let link_selector = Selector::parse("a[href]")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
        let snippet_selector = Selector::parse("div.VwiC3b")
            .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

        let mut results = Vec::new();

        for element in document.select(&container_selector) {
            let title = match element.select(&title_selector).next() {
                Some(el) => el.text().collect::<String>().trim().to_string(),
                None => continue,
            };

            let url = match element
                .select(&link_selector)
                .next()
                .and_then(|el| el.value().attr("href"))
            {
                Some(href) => unwrap_redirect(href),
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

/// Rewrites Google's `/url?q=<real-url>&...` redirect links to the target.
fn unwrap_redirect(href: &str) -> String {
    match href.strip_prefix("/url?q=") {
        Some(rest) => rest.split('&').next().unwrap_or(rest).to_string(),
        None => href.to_string(),
    }
}

#[async_trait]
impl Engine for Google {
    fn id(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<EngineResponse> {
        let params = [("q", query.to_string()), ("num", "10".to_string())];
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::Fetched;

    struct StaticFetcher(Option<String>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str, _params: &[(&str, String)]) -> Fetched {
            Fetched {
                body: self.0.clone(),
                egress: "direct (203.0.113.7)".to_string(),
            }
        }
    }

    fn make_google(body: Option<&str>) -> Google {
        Google::new(Arc::new(StaticFetcher(body.map(str::to_string))))
    }

    #[test]
    fn test_unwrap_redirect() {
        assert_eq!(
            unwrap_redirect("/url?q=https://example.com/page&sa=U"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_unwrap_redirect_passthrough() {
        assert_eq!(
            unwrap_redirect("https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_parse_results_empty_html() {
        let engine = make_google(None);
        let results = engine.parse_results("<html><body></body></html>").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_with_results() {
        let engine = make_google(None);
        let html = r#"
            <html>
            <body>
                <div class="g">
                    <a href="https://www.rust-lang.org/">
                        <h3>Rust Programming Language</h3>
                    </a>
                    <div class="VwiC3b">A language empowering everyone.</div>
                </div>
                <div class="g">
                    <a href="https://doc.rust-lang.org/book/">
                        <h3>The Rust Book</h3>
                    </a>
                    <div class="VwiC3b">The official Rust book.</div>
                </div>
            </body>
            </html>
        "#;
        let results = engine.parse_results(html).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert_eq!(results[0].description, "A language empowering everyone.");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn test_parse_results_unwraps_redirect_url() {
        let engine = make_google(None);
        let html = r#"
            <html>
            <body>
                <div class="g">
                    <a href="/url?q=https://example.com/page&sa=U">
                        <h3>Example Page</h3>
                    </a>
                </div>
            </body>
            </html>
        "#;
        let results = engine.parse_results(html).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/page");
    }

    #[test]
    fn test_parse_results_skips_missing_title() {
        let engine = make_google(None);
        let html = r#"
            <html>
            <body>
                <div class="g">
                    <a href="https://example.com">No heading here</a>
                </div>
            </body>
            </html>
        "#;
        let results = engine.parse_results(html).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_ranks_stay_contiguous_past_skipped_entries() {
        let engine = make_google(None);
        let html = r#"
            <html>
            <body>
                <div class="g">
                    <a href="https://first.example.com"><h3>First</h3></a>
                </div>
                <div class="g">
                    <a href="https://skipped.example.com">no title element</a>
                </div>
                <div class="g">
                    <a href="https://second.example.com"><h3>Second</h3></a>
                </div>
            </body>
            </html>
        "#;
        let results = engine.parse_results(html).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
    }

    #[tokio::test]
    async fn test_search_no_body_yields_empty_response() {
        let engine = make_google(None);
        let response = engine.search("test").await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.egress, "direct (203.0.113.7)");
    }

    #[tokio::test]
    async fn test_search_parses_fetched_body() {
        let html = r#"
            <div class="g">
                <a href="https://www.rust-lang.org/"><h3>Rust</h3></a>
                <div class="VwiC3b">A systems language.</div>
            </div>
        "#;
        let engine = make_google(Some(html));
        let response = engine.search("rust").await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Rust");
    }

    #[test]
    fn test_engine_id() {
        let engine = make_google(None);
        assert_eq!(engine.id(), "google");
    }
}
