//! # Feed Source Crate
//!
//! This crate handles getting an RSS feed into memory and back out again.
//!
//! ## Main Components
//!
//! - **types**: `FeedItem` and `FeedDocument`, thin wrappers over the `rss` crate
//! - **codec**: Parse bytes into a `FeedDocument`, serialize it back
//! - **fetcher**: The `FeedSource` trait and its reqwest-backed `HttpFetcher`
//! - **fakes**: In-memory `MemorySource` for tests
//! - **error**: Error types for fetching and decoding
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_source::{fetch_document, serialize_feed, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new()?;
//! let mut doc = fetch_document(&fetcher, "https://news.ycombinator.com/rss").await?;
//!
//! let items = doc.take_items();
//! doc.replace_items(items.into_iter().take(10).collect());
//!
//! let bytes = serialize_feed(&doc)?;
//! ```

// Public modules
pub mod codec;
pub mod error;
pub mod fakes;
pub mod fetcher;
pub mod types;

// Re-export commonly used types for convenience
pub use codec::{parse_feed, serialize_feed};
pub use error::{FeedError, Result};
pub use fetcher::{FeedSource, HttpFetcher, fetch_document};
pub use types::{FeedDocument, FeedItem};
