//! Outbound document fetching, one GET per candidate document.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Sent with every document request; some hosts refuse non-browser agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("document fetch timed out")]
    Timeout,

    #[error("document host returned HTTP {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Raw body plus the declared content type, if any.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Retrieves documents for the pipeline. Swappable so tests never touch the network.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}

#[derive(Clone)]
pub struct HttpDocumentFetcher {
    client: Client,
}

impl HttpDocumentFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        debug!(url, size = bytes.len(), "document fetched");

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_sends_browser_agent_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cv.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpDocumentFetcher::new(Duration::from_secs(5)).unwrap();
        let doc = fetcher
            .fetch(&format!("{}/cv.pdf", server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.bytes.as_ref(), b"%PDF-1.4");
        assert_eq!(doc.content_type.as_deref(), Some("application/pdf"));

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap();
        assert_eq!(agent.to_str().unwrap(), BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn test_fetch_maps_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpDocumentFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing.pdf", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = HttpDocumentFetcher::new(Duration::from_millis(50)).unwrap();
        let err = fetcher
            .fetch(&format!("{}/slow.pdf", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_fetch_network_failure() {
        let fetcher = HttpDocumentFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/cv.pdf").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout));
    }
}
