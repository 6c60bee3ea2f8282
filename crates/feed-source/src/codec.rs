//! RSS codec.
//!
//! Decoding and encoding are delegated to the `rss` crate; this module
//! only maps its errors into [`FeedError`] and fixes the output layout
//! (pretty-printed, four-space indent).

use crate::error::{FeedError, Result};
use crate::types::FeedDocument;
use rss::Channel;
use tracing::debug;

const INDENT_CHAR: u8 = b' ';
const INDENT_SIZE: usize = 4;

/// Parse raw RSS bytes into a [`FeedDocument`]
pub fn parse_feed(bytes: &[u8]) -> Result<FeedDocument> {
    let channel = Channel::read_from(bytes).map_err(|e| FeedError::Parse(e.to_string()))?;
    debug!(
        "Parsed feed '{}' with {} items",
        channel.title(),
        channel.items().len()
    );
    Ok(FeedDocument::from(channel))
}

/// Serialize a [`FeedDocument`] back to RSS bytes
pub fn serialize_feed(document: &FeedDocument) -> Result<Vec<u8>> {
    document
        .channel()
        .pretty_write_to(Vec::new(), INDENT_CHAR, INDENT_SIZE)
        .map_err(|e| FeedError::Serialize(e.to_string()))
}
