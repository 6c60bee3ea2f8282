//! Error types for the filtering pipeline.
//!
//! There are two very different kinds of failure here:
//! - [`PredicateError`]: one item could not be classified. Local and
//!   recoverable; the item is dropped from the output and recorded in the
//!   run's diagnostics, the rest of the batch carries on.
//! - [`EngineError`]: the whole run failed (outer feed unavailable, or the
//!   fan-in lost track of outstanding evaluations). Returned to the caller.

use feed_source::FeedError;
use std::time::Duration;
use thiserror::Error;

/// Why a predicate could not decide pass/fail for an item
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredicateError {
    /// The item carries no link for the predicate to follow
    #[error("Item has no link to evaluate")]
    MissingLink,

    /// Fetching the item's linked page failed
    #[error("Failed to fetch {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    /// The page was fetched but the score pattern was not in it
    #[error("No text matched the points pattern")]
    PatternNotFound,

    /// The pattern matched but the captured text is not a usable number
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// The predicate did not finish within the configured deadline
    #[error("Evaluation timed out after {0:?}")]
    Timeout(Duration),

    /// The predicate panicked; the panic was contained to its task
    #[error("Predicate panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

/// Errors that abort a whole filtering run
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fetching or parsing the outer feed failed
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Every evaluation task exited but fewer outcomes than dispatched
    /// items were delivered
    #[error("Received {received} of {expected} outcomes before all evaluation tasks exited")]
    Coordination { expected: usize, received: usize },
}

impl EngineError {
    /// True when the outer feed could not be reached at all
    pub fn is_upstream_unreachable(&self) -> bool {
        matches!(self, EngineError::Feed(err) if err.is_unreachable())
    }
}
