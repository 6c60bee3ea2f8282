//! Core traits for the filtering pipeline.
//!
//! This module defines the Predicate trait: the caller-supplied, fallible,
//! asynchronous pass/fail decision the engine runs once per item.

use crate::error::PredicateError;
use async_trait::async_trait;
use std::future::Future;

/// Decides whether one item belongs in the filtered output.
///
/// ## Design Note
/// - `Send + Sync` because the engine shares a single instance (behind an
///   `Arc`) across every concurrently running evaluation task
/// - Implementations must not assume exclusive access to any shared state
///   beyond the item they are given
/// - `Ok(false)` and `Err(_)` both keep the item out of the output; the
///   error is kept for diagnostics
#[async_trait]
pub trait Predicate<T: Sync>: Send + Sync {
    /// Returns the name of this predicate (for logging/debugging)
    fn name(&self) -> &str;

    /// Evaluate the predicate for a single item.
    ///
    /// # Returns
    /// * `Ok(true)` - The item passes
    /// * `Ok(false)` - The item is rejected
    /// * `Err` - The predicate could not decide
    async fn evaluate(&self, item: &T) -> Result<bool, PredicateError>;
}

/// A [`Predicate`] built from an async closure. See [`predicate_fn`].
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

impl<F> FnPredicate<F> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap an async closure as a [`Predicate`].
///
/// The returned future must own whatever it needs from the item, so clone
/// the relevant fields before the `async move` block.
///
/// ```ignore
/// let long_titles = predicate_fn("long-titles", |item: &FeedItem| {
///     let len = item.title().map(str::len).unwrap_or(0);
///     async move { Ok(len > 40) }
/// });
/// ```
pub fn predicate_fn<T, F, Fut>(name: impl Into<String>, f: F) -> FnPredicate<F>
where
    T: Sync,
    F: Fn(&T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, PredicateError>> + Send,
{
    FnPredicate {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<T, F, Fut> Predicate<T> for FnPredicate<F>
where
    T: Sync,
    F: Fn(&T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, PredicateError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, item: &T) -> Result<bool, PredicateError> {
        (self.f)(item).await
    }
}
