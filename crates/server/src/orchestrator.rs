//! # Feed Orchestrator
//!
//! This module coordinates one filtered-feed request:
//! 1. Build the points predicate for the requested threshold
//! 2. Fetch and parse the upstream feed
//! 3. Evaluate the predicate for every item concurrently
//! 4. Replace the item list with the accepted items
//! 5. Serialize the result back to RSS
//!
//! Nothing is cached between requests; every call fetches the feed and
//! every comments page again.

use std::sync::Arc;
use std::time::Instant;

use feed_source::{FeedSource, serialize_feed};
use pipeline::predicates::PointsThreshold;
use pipeline::{FeedFilter, FilterEngine, FilteredFeed};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Serialized result of one request
#[derive(Debug, Clone)]
pub struct RenderedFeed {
    /// RSS bytes ready to send
    pub body: Vec<u8>,
    pub accepted: usize,
    pub rejected: usize,
    /// Items whose score could not be determined
    pub failed: usize,
}

/// Main orchestrator that coordinates the filtering pipeline
#[derive(Clone)]
pub struct FeedOrchestrator {
    feed_url: String,
    source: Arc<dyn FeedSource>,
    filter: FeedFilter,
}

impl FeedOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    /// * `source` - Used for the outer feed and for every comments page
    /// * `config` - Feed URL and engine limits
    pub fn new(source: Arc<dyn FeedSource>, config: &ServerConfig) -> Self {
        let filter = FeedFilter::new(source.clone(), FilterEngine::new(config.engine.clone()));
        Self {
            feed_url: config.feed_url.clone(),
            source,
            filter,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Fetch the upstream feed and keep items with at least `min_points`
    pub async fn filtered_feed(&self, min_points: u64) -> Result<FilteredFeed, AppError> {
        let start_time = Instant::now();
        let predicate = Arc::new(PointsThreshold::new(self.source.clone(), min_points));

        let filtered = self.filter.filter_feed(&self.feed_url, predicate).await?;

        if !filtered.failures.is_empty() {
            warn!(
                "{} items could not be scored for threshold {}",
                filtered.failures.len(),
                min_points
            );
        }
        info!(
            "Filtered {} for {} points: kept {}, rejected {}, failed {} in {:.2?}",
            self.feed_url,
            min_points,
            filtered.accepted(),
            filtered.rejected,
            filtered.failures.len(),
            start_time.elapsed()
        );
        Ok(filtered)
    }

    /// Same as [`FeedOrchestrator::filtered_feed`], serialized to RSS
    pub async fn render(&self, min_points: u64) -> Result<RenderedFeed, AppError> {
        let filtered = self.filtered_feed(min_points).await?;
        let body = serialize_feed(&filtered.document).map_err(AppError::Serialize)?;
        Ok(RenderedFeed {
            body,
            accepted: filtered.accepted(),
            rejected: filtered.rejected,
            failed: filtered.failures.len(),
        })
    }
}
