//! The FilterEngine ties fan-out and fan-in together.
//!
//! ## Algorithm
//! 1. N = number of items; if N = 0, return an empty report (no tasks)
//! 2. Open an unbounded outcome channel
//! 3. Dispatch one evaluation task per item
//! 4. Drop our own sender so the channel closes once every task is done
//! 5. Collect exactly N outcomes
//!
//! Each call is independent: nothing is kept between runs except the
//! configuration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::{info, instrument};

use crate::collector::{FilterStream, collect};
use crate::dispatcher::{DispatchOptions, dispatch};
use crate::error::EngineError;
use crate::outcome::FilterReport;
use crate::traits::Predicate;

/// Tuning for a [`FilterEngine`].
///
/// The default is one unbounded task per item with no deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of predicate calls in flight at once
    pub max_concurrency: Option<usize>,
    /// Deadline for each individual predicate call
    pub predicate_timeout: Option<Duration>,
}

impl EngineConfig {
    /// Cap in-flight predicate calls (builder pattern). Zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Set a per-call deadline (builder pattern)
    pub fn with_predicate_timeout(mut self, timeout: Duration) -> Self {
        self.predicate_timeout = Some(timeout);
        self
    }
}

/// Evaluates a predicate over a batch of items concurrently.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    config: EngineConfig,
}

impl FilterEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Filter `items`, waiting for every evaluation to finish.
    ///
    /// # Returns
    /// * `Ok(FilterReport)` - accepted items (arrival order) plus rejection
    ///   and failure diagnostics
    /// * `Err(EngineError::Coordination)` - an evaluation task went away
    ///   without reporting
    #[instrument(skip_all, fields(items = items.len(), predicate = predicate.name()))]
    pub async fn filter<T, P>(
        &self,
        items: Vec<T>,
        predicate: Arc<P>,
    ) -> Result<FilterReport<T>, EngineError>
    where
        T: Send + Sync + 'static,
        P: Predicate<T> + ?Sized + 'static,
    {
        if items.is_empty() {
            return Ok(FilterReport::new());
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let expected = dispatch(items, predicate, &self.dispatch_options(), &sender);
        drop(sender);

        let report = collect(receiver, expected).await?;
        info!(
            "Filtered {} items: {} accepted, {} rejected, {} could not be evaluated",
            expected,
            report.accepted.len(),
            report.rejected,
            report.failures.len()
        );
        Ok(report)
    }

    /// Filter `items`, yielding accepted ones as soon as they are decided.
    ///
    /// Must be called from within a tokio runtime; evaluation starts
    /// immediately, not on first poll.
    pub fn filter_stream<T, P>(&self, items: Vec<T>, predicate: Arc<P>) -> FilterStream<T>
    where
        T: Send + Sync + 'static,
        P: Predicate<T> + ?Sized + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let expected = if items.is_empty() {
            0
        } else {
            dispatch(items, predicate, &self.dispatch_options(), &sender)
        };
        drop(sender);
        FilterStream::new(receiver, expected)
    }

    /// Fresh per-run options; the semaphore is never shared between runs.
    fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            limiter: self
                .config
                .max_concurrency
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
            timeout: self.config.predicate_timeout,
        }
    }
}
