//! Fan-out: one evaluation task per item.
//!
//! ## Contract
//! Every spawned task sends exactly one [`Outcome`] before it exits, no
//! matter how the predicate behaves:
//! - `Ok(true)` / `Ok(false)` / `Err` map onto Accepted / Rejected / Failed
//! - a panic inside the predicate is caught and sent as `Failed(Panicked)`
//! - a call that overruns the deadline is dropped and sent as `Failed(Timeout)`
//!
//! The collector counts on this: it stops after receiving one outcome per
//! dispatched item.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

use crate::error::PredicateError;
use crate::outcome::Outcome;
use crate::traits::Predicate;

/// Per-run knobs for the evaluation tasks
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Caps how many predicate calls run at once. `None` means unbounded.
    pub limiter: Option<Arc<Semaphore>>,
    /// Deadline for a single predicate call. `None` means no deadline.
    pub timeout: Option<Duration>,
}

/// Spawn one task per item, each sending its outcome on `sender`.
///
/// # Returns
/// The number of tasks spawned, which is the number of outcomes the
/// receiving side must wait for.
pub fn dispatch<T, P>(
    items: Vec<T>,
    predicate: Arc<P>,
    options: &DispatchOptions,
    sender: &mpsc::UnboundedSender<Outcome<T>>,
) -> usize
where
    T: Send + Sync + 'static,
    P: Predicate<T> + ?Sized + 'static,
{
    let count = items.len();
    debug!(
        "Dispatching {} evaluations of predicate {}",
        count,
        predicate.name()
    );

    for item in items {
        let predicate = Arc::clone(&predicate);
        let options = options.clone();
        let sender = sender.clone();

        tokio::spawn(async move {
            let outcome = evaluate(item, &*predicate, options).await;
            if sender.send(outcome).is_err() {
                warn!("Outcome dropped: collector is gone");
            }
        });
    }

    count
}

/// Run the predicate for one item and turn whatever happens into an outcome.
async fn evaluate<T, P>(item: T, predicate: &P, options: DispatchOptions) -> Outcome<T>
where
    T: Send + Sync,
    P: Predicate<T> + ?Sized,
{
    // Held until the call finishes; waiting for a permit does not count
    // against the deadline.
    let _permit = match options.limiter {
        Some(limiter) => limiter.acquire_owned().await.ok(),
        None => None,
    };

    // The call happens inside the wrapped future so panics raised before
    // the predicate returns its future are caught too.
    let call = AssertUnwindSafe(async { predicate.evaluate(&item).await }).catch_unwind();
    let result = match options.timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Ok(Err(PredicateError::Timeout(limit))),
        },
        None => call.await,
    };

    let result = result.unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!("Predicate {} panicked: {}", predicate.name(), message);
        Err(PredicateError::Panicked(message))
    });

    Outcome::from_evaluation(item, result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
