//! Core feed types.
//!
//! Both types are thin wrappers around the `rss` crate's structs. Wrapping
//! keeps the RSS library out of every signature in the workspace and gives
//! us one place to put the few accessors predicates actually need, while
//! every field of the underlying document survives a parse/serialize trip.

use rss::{Channel, Item};

/// One `<item>` of a feed.
///
/// The filtering engine never looks inside an item; it hands it to a
/// predicate and, if accepted, back into the output list. The accessors
/// below exist for predicates and for reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedItem {
    inner: Item,
}

impl FeedItem {
    /// Create an item with just a title set
    pub fn new(title: impl Into<String>) -> Self {
        let mut inner = Item::default();
        inner.set_title(title.into());
        Self { inner }
    }

    /// Set the item's link (builder pattern)
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.inner.set_link(link.into());
        self
    }

    /// Set the item's description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.inner.set_description(description.into());
        self
    }

    /// Set the item's comments URI (builder pattern)
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.inner.set_comments(comments.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.inner.title()
    }

    pub fn link(&self) -> Option<&str> {
        self.inner.link()
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    /// URI of the item's discussion page, if the feed provides one
    pub fn comments(&self) -> Option<&str> {
        self.inner.comments()
    }

    /// Short human-readable label for logs: the title, else the link.
    pub fn label(&self) -> &str {
        self.title().or_else(|| self.link()).unwrap_or("<untitled>")
    }
}

impl From<Item> for FeedItem {
    fn from(inner: Item) -> Self {
        Self { inner }
    }
}

impl From<FeedItem> for Item {
    fn from(item: FeedItem) -> Self {
        item.inner
    }
}

/// A parsed feed: channel metadata plus an ordered list of items.
///
/// ## Lifecycle
/// 1. Created by [`crate::parse_feed`]
/// 2. Item list taken out with [`FeedDocument::take_items`] and replaced
///    exactly once with [`FeedDocument::replace_items`]
/// 3. Written back out with [`crate::serialize_feed`]
///
/// Channel-level fields are never touched along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedDocument {
    channel: Channel,
}

impl FeedDocument {
    /// Create an empty document with the given channel title
    pub fn new(title: impl Into<String>) -> Self {
        let mut channel = Channel::default();
        channel.set_title(title.into());
        Self { channel }
    }

    /// Set the channel link (builder pattern)
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.channel.set_link(link.into());
        self
    }

    /// Set the channel description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.channel.set_description(description.into());
        self
    }

    /// Set the item list (builder pattern)
    pub fn with_items(mut self, items: Vec<FeedItem>) -> Self {
        self.replace_items(items);
        self
    }

    pub fn title(&self) -> &str {
        self.channel.title()
    }

    pub fn link(&self) -> &str {
        self.channel.link()
    }

    pub fn description(&self) -> &str {
        self.channel.description()
    }

    /// Number of items currently in the document
    pub fn len(&self) -> usize {
        self.channel.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.items.is_empty()
    }

    /// Clone the current item list out of the document
    pub fn items(&self) -> Vec<FeedItem> {
        self.channel.items.iter().cloned().map(FeedItem::from).collect()
    }

    /// Move the item list out, leaving the document with no items
    pub fn take_items(&mut self) -> Vec<FeedItem> {
        std::mem::take(&mut self.channel.items)
            .into_iter()
            .map(FeedItem::from)
            .collect()
    }

    /// Replace the item list, leaving all channel metadata untouched
    pub fn replace_items(&mut self, items: Vec<FeedItem>) {
        self.channel.items = items.into_iter().map(Item::from).collect();
    }

    pub(crate) fn channel(&self) -> &Channel {
        &self.channel
    }
}

impl From<Channel> for FeedDocument {
    fn from(channel: Channel) -> Self {
        Self { channel }
    }
}
