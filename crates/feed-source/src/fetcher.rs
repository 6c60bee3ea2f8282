//! Fetching remote resources.
//!
//! [`FeedSource`] is the seam between the filtering code and the network:
//! the outer feed and every per-item page go through it, so tests can swap
//! in [`crate::fakes::MemorySource`] and never touch a socket.

use crate::codec::parse_feed;
use crate::error::{FeedError, Result};
use crate::types::FeedDocument;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Anything that can turn a URI into bytes.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the resource at `uri` and return its body
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Fetch `uri` from `source` and parse it as RSS.
pub async fn fetch_document(source: &dyn FeedSource, uri: &str) -> Result<FeedDocument> {
    let bytes = source.fetch(uri).await?;
    parse_feed(&bytes)
}

/// [`FeedSource`] backed by a shared `reqwest::Client`.
///
/// The client pools connections, so one fetcher should be built at
/// startup and cloned (cheaply) wherever it is needed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = concat!("feed-diet/", env!("CARGO_PKG_VERSION"));

    /// Build a fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Build a fetcher whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let response = self.client.get(uri).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", uri, e);
            FeedError::Unreachable {
                uri: uri.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered with status {}", uri, status);
            return Err(FeedError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FeedError::Unreachable {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Fetched {} bytes from {}", body.len(), uri);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    const FEED: &str = r#"<rss version="2.0"><channel><title>Mock</title><link>http://mock/</link><description>d</description><item><title>only</title></item></channel></rss>"#;

    /// Start a mock upstream on a random port
    async fn start_mock_upstream() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route("/rss", get(|| async { FEED }))
            .route("/broken", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock upstream failed");
        });

        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_http_fetch_and_parse() {
        let (base, handle) = start_mock_upstream().await;
        let fetcher = HttpFetcher::new().unwrap();

        let doc = fetch_document(&fetcher, &format!("{base}/rss")).await.unwrap();
        assert_eq!(doc.title(), "Mock");
        assert_eq!(doc.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_http_non_success_status() {
        let (base, handle) = start_mock_upstream().await;
        let fetcher = HttpFetcher::new().unwrap();

        let err = fetcher.fetch(&format!("{base}/broken")).await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 503, .. }));
        assert!(!err.is_unreachable());

        handle.abort();
    }

    #[tokio::test]
    async fn test_http_unreachable() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/rss")).await.unwrap_err();
        assert!(err.is_unreachable(), "got {err:?}");
    }
}
