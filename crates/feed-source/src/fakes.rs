//! In-memory fakes for [`FeedSource`] (testing only)
//!
//! `MemorySource` serves canned bodies by URI and counts how often each URI
//! was requested, so tests can assert exactly-once fetch behavior.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FeedError, Result};
use crate::fetcher::FeedSource;

#[derive(Debug, Clone)]
enum Response {
    Body(Vec<u8>),
    Status(u16),
}

/// In-memory source backed by a `HashMap<uri, response>`.
///
/// Unknown URIs fail with [`FeedError::Unreachable`].
#[derive(Debug, Default)]
pub struct MemorySource {
    responses: Mutex<HashMap<String, Response>>,
    hits: Mutex<HashMap<String, usize>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `uri` (builder pattern)
    pub fn with_body(self, uri: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(uri, body);
        self
    }

    /// Answer `uri` with a non-success HTTP status (builder pattern)
    pub fn with_status(self, uri: impl Into<String>, status: u16) -> Self {
        lock(&self.responses).insert(uri.into(), Response::Status(status));
        self
    }

    /// Sleep for `delay` before answering `uri` (builder pattern)
    pub fn with_delay(self, uri: impl Into<String>, delay: Duration) -> Self {
        lock(&self.delays).insert(uri.into(), delay);
        self
    }

    pub fn insert(&self, uri: impl Into<String>, body: impl Into<Vec<u8>>) {
        lock(&self.responses).insert(uri.into(), Response::Body(body.into()));
    }

    /// How many times `uri` has been fetched
    pub fn hits(&self, uri: &str) -> usize {
        lock(&self.hits).get(uri).copied().unwrap_or(0)
    }

    /// Total fetches across all URIs
    pub fn total_hits(&self) -> usize {
        lock(&self.hits).values().sum()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl FeedSource for MemorySource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        *lock(&self.hits).entry(uri.to_string()).or_insert(0) += 1;

        let delay = lock(&self.delays).get(uri).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = lock(&self.responses).get(uri).cloned();
        match response {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Status(status)) => Err(FeedError::Status {
                uri: uri.to_string(),
                status,
            }),
            None => Err(FeedError::Unreachable {
                uri: uri.to_string(),
                reason: "no canned response".to_string(),
            }),
        }
    }
}
