//! Error types for the feed-source crate.
//!
//! Fetching and decoding a feed can fail in a handful of distinct ways,
//! and callers care about the difference: an unreachable upstream is a
//! gateway problem, while a malformed document or a failed re-encode is
//! an internal one. Each case gets its own variant.

use thiserror::Error;

/// Errors that can occur while fetching, parsing or serializing a feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The remote resource could not be reached (DNS, connect, TLS,
    /// timeout, or the body stream broke midway)
    #[error("Failed to reach {uri}: {reason}")]
    Unreachable { uri: String, reason: String },

    /// The remote answered, but not with a success status
    #[error("Unexpected status {status} from {uri}")]
    Status { uri: String, status: u16 },

    /// The local HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The bytes we got back are not a valid RSS document
    #[error("Failed to parse feed: {0}")]
    Parse(String),

    /// Writing the document back out failed
    #[error("Failed to serialize feed: {0}")]
    Serialize(String),
}

impl FeedError {
    /// True when the failure happened at the transport level, before any
    /// response was received.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FeedError::Unreachable { .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeedError>;
