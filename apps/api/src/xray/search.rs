//! Web-search provider seam and multi-page result collection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::candidate::RawResult;

pub const RESULTS_PER_PAGE: u32 = 10;
pub const DEFAULT_SEARCH_PAGES: u32 = 3;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(200);

const CUSTOM_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search quota exceeded")]
    QuotaExceeded,

    #[error("search provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("search request failed: {0}")]
    Network(String),

    #[error("malformed search response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Network(e.to_string())
    }
}

/// Source of raw web-search hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetches up to [`RESULTS_PER_PAGE`] hits starting at the 1-based `start` offset.
    async fn search_page(&self, query: &str, start: u32) -> Result<Vec<RawResult>, SearchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Google Custom Search
// ────────────────────────────────────────────────────────────────────────────

pub struct GoogleCustomSearch {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl GoogleCustomSearch {
    pub fn new(client: Client, api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            endpoint: CUSTOM_SEARCH_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct CustomSearchPage {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// 403 only means quota when the body says so; other 403s are key/config problems.
fn is_quota_body(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("quota") || lower.contains("ratelimitexceeded")
}

#[async_trait]
impl SearchProvider for GoogleCustomSearch {
    async fn search_page(&self, query: &str, start: u32) -> Result<Vec<RawResult>, SearchError> {
        let num = RESULTS_PER_PAGE.to_string();
        let start = start.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::QuotaExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::FORBIDDEN && is_quota_body(&body) {
                return Err(SearchError::QuotaExceeded);
            }
            return Err(SearchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let page: CustomSearchPage = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(page
            .items
            .into_iter()
            .map(|item| RawResult::new(item.title, item.link, item.snippet))
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub results: Vec<RawResult>,
    pub pages_fetched: u32,
    pub quota_exceeded: bool,
}

/// Requests up to `pages` consecutive pages, pausing `page_delay` between them.
///
/// Quota exhaustion stops pagination and is reported on the outcome. Other
/// page failures are logged and skipped.
pub async fn collect_results(
    provider: &dyn SearchProvider,
    query: &str,
    pages: u32,
    page_delay: Duration,
) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();

    for page in 0..pages {
        if page > 0 && !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }

        let start = page * RESULTS_PER_PAGE + 1;
        match provider.search_page(query, start).await {
            Ok(results) => {
                outcome.pages_fetched += 1;
                let empty = results.is_empty();
                outcome.results.extend(results);
                if empty {
                    break;
                }
            }
            Err(SearchError::QuotaExceeded) => {
                warn!(page = page + 1, "search quota exceeded, stopping pagination");
                outcome.quota_exceeded = true;
                break;
            }
            Err(e) => {
                warn!(page = page + 1, error = %e, "search page failed");
            }
        }
    }

    info!(
        results = outcome.results.len(),
        pages = outcome.pages_fetched,
        quota_exceeded = outcome.quota_exceeded,
        "search pages collected"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(prefix: &str, n: usize) -> serde_json::Value {
        let items: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "title": format!("{prefix} {i}"),
                    "link": format!("https://example.com/{prefix}-{i}.pdf"),
                    "snippet": "Registered nurse resume",
                })
            })
            .collect();
        json!({ "items": items })
    }

    fn provider(server: &MockServer) -> GoogleCustomSearch {
        GoogleCustomSearch::new(Client::new(), "key", "cx")
            .with_endpoint(format!("{}/customsearch/v1", server.uri()))
    }

    #[tokio::test]
    async fn test_quota_on_second_page_keeps_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body("p1", 10)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("start", "11"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("start", "21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body("p3", 10)))
            .expect(0)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let outcome = collect_results(&provider, "\"rn\"", 3, Duration::ZERO).await;
        assert_eq!(outcome.results.len(), 10);
        assert_eq!(outcome.pages_fetched, 1);
        assert!(outcome.quota_exceeded);
    }

    #[tokio::test]
    async fn test_forbidden_with_quota_reason_is_quota() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "errors": [{ "reason": "dailyLimitExceeded", "message": "Quota exceeded for quota metric" }] }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).search_page("q", 1).await.unwrap_err();
        assert!(matches!(err, SearchError::QuotaExceeded));
    }

    #[tokio::test]
    async fn test_forbidden_without_quota_reason_is_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = provider(&server).search_page("q", 1).await.unwrap_err();
        assert!(matches!(err, SearchError::Http { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_sends_credentials_and_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "key"))
            .and(query_param("cx", "cx"))
            .and(query_param("num", "10"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body("a", 2)))
            .expect(1)
            .mount(&server)
            .await;

        let hits = provider(&server).search_page("q", 1).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://example.com/a-0.pdf");
    }

    #[tokio::test]
    async fn test_missing_items_is_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "customsearch#search" })))
            .mount(&server)
            .await;

        let outcome = collect_results(&provider(&server), "q", 3, Duration::ZERO).await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.pages_fetched, 1);
        assert!(!outcome.quota_exceeded);
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start", "11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body("p2", 10)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start", "21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body("p3", 3)))
            .mount(&server)
            .await;

        let outcome = collect_results(&provider(&server), "q", 3, Duration::ZERO).await;
        assert_eq!(outcome.results.len(), 13);
        assert_eq!(outcome.pages_fetched, 2);
    }
}
