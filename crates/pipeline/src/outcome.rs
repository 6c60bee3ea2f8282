//! The result of one predicate evaluation.
//!
//! Every dispatched task produces exactly one [`Outcome`] and the collector
//! consumes exactly one per task. [`FilterReport`] is what the collector
//! builds out of them.

use crate::error::PredicateError;

/// Tagged result of evaluating the predicate for one item
#[derive(Debug)]
pub enum Outcome<T> {
    /// Predicate returned `true`; the item goes to the output
    Accepted(T),
    /// Predicate returned `false`
    Rejected,
    /// Predicate could not decide; the item is kept only for diagnostics
    Failed { item: T, error: PredicateError },
}

impl<T> Outcome<T> {
    /// Map a predicate result for `item` onto an outcome
    pub fn from_evaluation(item: T, result: Result<bool, PredicateError>) -> Self {
        match result {
            Ok(true) => Outcome::Accepted(item),
            Ok(false) => Outcome::Rejected,
            Err(error) => Outcome::Failed { item, error },
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }
}

/// An item the predicate could not classify, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationFailure<T> {
    pub item: T,
    pub error: PredicateError,
}

/// Everything a filtering run learned about its input.
///
/// `accepted` is in arrival order, which depends on how fast each
/// predicate call finished and not on input order.
#[derive(Debug, Clone)]
pub struct FilterReport<T> {
    pub accepted: Vec<T>,
    pub rejected: usize,
    pub failures: Vec<EvaluationFailure<T>>,
}

impl<T> FilterReport<T> {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: 0,
            failures: Vec::new(),
        }
    }

    /// Fold one outcome into the report
    pub fn record(&mut self, outcome: Outcome<T>) {
        match outcome {
            Outcome::Accepted(item) => self.accepted.push(item),
            Outcome::Rejected => self.rejected += 1,
            Outcome::Failed { item, error } => {
                self.failures.push(EvaluationFailure { item, error })
            }
        }
    }

    /// Number of outcomes folded in so far
    pub fn evaluated(&self) -> usize {
        self.accepted.len() + self.rejected + self.failures.len()
    }
}

impl<T> Default for FilterReport<T> {
    fn default() -> Self {
        Self::new()
    }
}
