//! Predicate that keeps items whose discussion page shows enough points.
//!
//! ## Algorithm
//! For each item:
//! 1. Follow the item's `comments` link through the [`FeedSource`]
//! 2. Find the first `<integer> points` in the page (ASCII digits only)
//! 3. Keep the item if that integer is >= the threshold
//!
//! Scraping free-form HTML with one regex is fragile by nature; if the
//! page layout changes, items start failing with `PatternNotFound` rather
//! than being silently misclassified.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use feed_source::{FeedItem, FeedSource};
use regex::Regex;
use tracing::debug;

use crate::error::PredicateError;
use crate::traits::Predicate;

static POINTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+) points").expect("points pattern is a valid regex"));

/// Pull the first `<integer> points` score out of a page.
pub fn extract_points(page: &str) -> Result<u64, PredicateError> {
    let captures = POINTS_PATTERN
        .captures(page)
        .ok_or(PredicateError::PatternNotFound)?;
    let digits = captures
        .get(1)
        .ok_or(PredicateError::PatternNotFound)?
        .as_str();
    digits
        .parse::<u64>()
        .map_err(|e| PredicateError::InvalidScore(format!("{digits}: {e}")))
}

/// Keeps items scoring at least `min_points` on their discussion page.
pub struct PointsThreshold {
    source: Arc<dyn FeedSource>,
    min_points: u64,
}

impl PointsThreshold {
    /// Create a new PointsThreshold.
    ///
    /// # Arguments
    /// * `source` - Where to fetch each item's comments page from
    /// * `min_points` - Inclusive lower bound on the scraped score
    pub fn new(source: Arc<dyn FeedSource>, min_points: u64) -> Self {
        Self { source, min_points }
    }
}

#[async_trait]
impl Predicate<FeedItem> for PointsThreshold {
    fn name(&self) -> &str {
        "PointsThreshold"
    }

    async fn evaluate(&self, item: &FeedItem) -> Result<bool, PredicateError> {
        let uri = item.comments().ok_or(PredicateError::MissingLink)?;

        let page = self
            .source
            .fetch(uri)
            .await
            .map_err(|e| PredicateError::Fetch {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;

        let points = extract_points(&String::from_utf8_lossy(&page))?;
        debug!(
            "'{}' has {} points (threshold {})",
            item.label(),
            points,
            self.min_points
        );
        Ok(points >= self.min_points)
    }
}
