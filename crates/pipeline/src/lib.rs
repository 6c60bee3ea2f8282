//! Concurrent filtering of feed items.
//!
//! This crate provides:
//! - Predicate trait for caller-supplied pass/fail decisions
//! - Fan-out dispatcher (one task per item) and fan-in collector
//! - FilterEngine for composing the two, in batch or streaming form
//! - FeedFilter for running the engine over a fetched feed
//! - PointsThreshold, the predicate behind the Hacker News endpoint
//!
//! ## Architecture
//! A filtering run processes items in stages:
//! 1. Dispatcher spawns one evaluation task per item
//! 2. Each task calls the predicate and sends exactly one Outcome
//! 3. Collector receives N outcomes and keeps the accepted items
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{EngineConfig, FeedFilter, FilterEngine};
//! use pipeline::predicates::PointsThreshold;
//!
//! let engine = FilterEngine::new(
//!     EngineConfig::default()
//!         .with_max_concurrency(16)
//!         .with_predicate_timeout(Duration::from_secs(10)),
//! );
//! let filter = FeedFilter::new(fetcher.clone(), engine);
//!
//! let predicate = Arc::new(PointsThreshold::new(fetcher, 100));
//! let filtered = filter.filter_feed("https://news.ycombinator.com/rss", predicate).await?;
//! ```

pub mod collector;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod feed_filter;
pub mod outcome;
pub mod predicates;
pub mod traits;

// Re-export main types
pub use collector::FilterStream;
pub use engine::{EngineConfig, FilterEngine};
pub use error::{EngineError, PredicateError};
pub use feed_filter::{FeedFilter, FilteredFeed};
pub use outcome::{EvaluationFailure, FilterReport, Outcome};
pub use traits::{FnPredicate, Predicate, predicate_fn};
