//! Runtime configuration for the HTTP service.
//!
//! Values come from the command line (see the `cli` crate), each flag
//! falling back to an environment variable and then to [`ServerConfig::default`].

use std::net::SocketAddr;
use std::time::Duration;

use pipeline::EngineConfig;

/// Upstream feed the `/feeds/hn/...` endpoint filters
pub const DEFAULT_FEED_URL: &str = "https://news.ycombinator.com/rss";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;
pub const DEFAULT_PREDICATE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: SocketAddr,
    /// RSS feed to fetch and filter
    pub feed_url: String,
    /// Fan-out limits applied to every request
    pub engine: EngineConfig,
    /// Per-request HTTP timeout for the outer feed and each comments page
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            feed_url: DEFAULT_FEED_URL.to_string(),
            engine: EngineConfig::default()
                .with_max_concurrency(DEFAULT_MAX_CONCURRENCY)
                .with_predicate_timeout(DEFAULT_PREDICATE_TIMEOUT),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
