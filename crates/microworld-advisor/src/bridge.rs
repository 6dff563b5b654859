//! Synchronous, deadline-bound execution of async work.
//!
//! The turn pipeline is synchronous, while providers are async. The bridge
//! spawns the future on a tokio runtime and blocks the calling thread on a
//! channel with a deadline. When the deadline elapses the task is aborted and
//! any late result is discarded, so a call never blocks longer than the
//! deadline.
//!
//! The calling thread must not be the only worker of the runtime that runs
//! the task, or the task never gets polled and every call times out.

use std::future::Future;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::PlannerError;

/// Run `future` on `handle` and wait at most `deadline` for its output.
///
/// # Errors
///
/// - [`PlannerError::DeadlineExceeded`] if no output arrived in time; the
///   task is aborted.
/// - [`PlannerError::TaskFailed`] if the task ended without output.
pub fn run_with_deadline<F, T>(
    handle: &Handle,
    deadline: Duration,
    future: F,
) -> Result<T, PlannerError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let task = handle.spawn(async move {
        let output = future.await;
        // The receiver is gone once the deadline has passed.
        let _ = tx.send(output);
    });

    match rx.recv_timeout(deadline) {
        Ok(output) => Ok(output),
        Err(RecvTimeoutError::Timeout) => {
            task.abort();
            Err(PlannerError::DeadlineExceeded {
                timeout_ms: deadline.as_millis(),
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(PlannerError::TaskFailed),
    }
}
