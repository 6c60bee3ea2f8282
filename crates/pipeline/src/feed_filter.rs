//! Filtering a whole feed: fetch → filter → replace items.
//!
//! ## State machine
//! Idle → Fetching → (Fetched | FetchFailed) → Dispatching → Collecting → Done
//!
//! A failed fetch or parse ends the run with an error and no partial
//! result. Per-item predicate failures never do.

use std::sync::Arc;

use feed_source::{FeedDocument, FeedItem, FeedSource, fetch_document};
use tracing::{info, instrument};

use crate::engine::FilterEngine;
use crate::error::EngineError;
use crate::outcome::EvaluationFailure;
use crate::traits::Predicate;

/// A feed whose item list now holds only the accepted items.
#[derive(Debug, Clone)]
pub struct FilteredFeed {
    pub document: FeedDocument,
    /// Items the predicate said no to
    pub rejected: usize,
    /// Items the predicate could not decide on, with the reason
    pub failures: Vec<EvaluationFailure<FeedItem>>,
}

impl FilteredFeed {
    fn unchanged(document: FeedDocument) -> Self {
        Self {
            document,
            rejected: 0,
            failures: Vec::new(),
        }
    }

    /// Number of items that made it through
    pub fn accepted(&self) -> usize {
        self.document.len()
    }
}

/// Fetches a feed through a [`FeedSource`] and filters it with a [`FilterEngine`].
#[derive(Clone)]
pub struct FeedFilter {
    source: Arc<dyn FeedSource>,
    engine: FilterEngine,
}

impl FeedFilter {
    pub fn new(source: Arc<dyn FeedSource>, engine: FilterEngine) -> Self {
        Self { source, engine }
    }

    /// Fetch the feed at `uri` and keep only the items `predicate` accepts.
    ///
    /// # Returns
    /// * `Ok(FilteredFeed)` - the document with its item list replaced, plus
    ///   per-item diagnostics
    /// * `Err(EngineError::Feed)` - the feed could not be fetched or parsed
    #[instrument(skip(self, predicate))]
    pub async fn filter_feed<P>(
        &self,
        uri: &str,
        predicate: Arc<P>,
    ) -> Result<FilteredFeed, EngineError>
    where
        P: Predicate<FeedItem> + ?Sized + 'static,
    {
        let mut document = fetch_document(self.source.as_ref(), uri).await?;
        info!("Fetched '{}' with {} items", document.title(), document.len());

        if document.is_empty() {
            return Ok(FilteredFeed::unchanged(document));
        }

        let items = document.take_items();
        let report = self.engine.filter(items, predicate).await?;
        document.replace_items(report.accepted);

        Ok(FilteredFeed {
            document,
            rejected: report.rejected,
            failures: report.failures,
        })
    }
}
