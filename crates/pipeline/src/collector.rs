//! Fan-in: a single flow that receives every outcome.
//!
//! Two shapes over the same channel:
//! - [`collect`] waits for all outcomes and returns a [`FilterReport`]
//! - [`FilterStream`] yields accepted items as they arrive
//!
//! Both stop after `expected` outcomes. If every sender is dropped before
//! that (a task exited without reporting), they stop early instead of
//! waiting forever: [`collect`] returns [`EngineError::Coordination`] and
//! the stream ends with [`FilterStream::is_complete`] returning false.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::outcome::{EvaluationFailure, FilterReport, Outcome};

/// Receive exactly `expected` outcomes and fold them into a report.
///
/// Accepted items are appended in arrival order.
pub async fn collect<T>(
    mut receiver: mpsc::UnboundedReceiver<Outcome<T>>,
    expected: usize,
) -> Result<FilterReport<T>, EngineError> {
    let mut report = FilterReport::new();
    let mut received = 0;

    while received < expected {
        let Some(outcome) = receiver.recv().await else {
            warn!(
                "Outcome channel closed after {} of {} outcomes",
                received, expected
            );
            return Err(EngineError::Coordination { expected, received });
        };

        if let Outcome::Failed { error, .. } = &outcome {
            debug!("Evaluation failed: {}", error);
        }
        report.record(outcome);
        received += 1;
    }

    debug!(
        "Collected {} outcomes: {} accepted, {} rejected, {} failed",
        received,
        report.accepted.len(),
        report.rejected,
        report.failures.len()
    );
    Ok(report)
}

/// Lazy, unordered, finite sequence of accepted items.
///
/// Ends once `expected` outcomes have been observed. Rejections and
/// failures are not yielded but are tallied and can be inspected after
/// (or during) iteration.
pub struct FilterStream<T> {
    receiver: mpsc::UnboundedReceiver<Outcome<T>>,
    expected: usize,
    received: usize,
    rejected: usize,
    failures: Vec<EvaluationFailure<T>>,
    closed_early: bool,
}

// No field is structurally pinned.
impl<T> Unpin for FilterStream<T> {}

impl<T> FilterStream<T> {
    pub fn new(receiver: mpsc::UnboundedReceiver<Outcome<T>>, expected: usize) -> Self {
        Self {
            receiver,
            expected,
            received: 0,
            rejected: 0,
            failures: Vec::new(),
            closed_early: false,
        }
    }

    /// Number of outcomes the stream will consume in total
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Outcomes consumed so far
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn failures(&self) -> &[EvaluationFailure<T>] {
        &self.failures
    }

    /// True once every expected outcome has been received
    pub fn is_complete(&self) -> bool {
        !self.closed_early && self.received == self.expected
    }
}

impl<T> Stream for FilterStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();

        loop {
            if this.closed_early || this.received >= this.expected {
                return Poll::Ready(None);
            }

            match ready!(this.receiver.poll_recv(cx)) {
                Some(outcome) => {
                    this.received += 1;
                    match outcome {
                        Outcome::Accepted(item) => return Poll::Ready(Some(item)),
                        Outcome::Rejected => this.rejected += 1,
                        Outcome::Failed { item, error } => {
                            debug!("Evaluation failed: {}", error);
                            this.failures.push(EvaluationFailure { item, error });
                        }
                    }
                }
                None => {
                    warn!(
                        "Outcome channel closed after {} of {} outcomes",
                        this.received, this.expected
                    );
                    this.closed_early = true;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.expected.saturating_sub(self.received)))
    }
}
