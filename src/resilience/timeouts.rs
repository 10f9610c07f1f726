//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap outbound calls (auth validation, upstream request) with a deadline
//! - Cancel the wrapped operation cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A zero-second setting means "no deadline"
//! - Timeout errors are distinct from the wrapped operation's own errors

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} elapsed")]
pub struct DeadlineElapsed(pub Duration);

/// Convert a seconds setting into an optional deadline.
pub fn from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Run `fut`, giving up after `deadline` when one is set.
pub async fn with_deadline<F: Future>(
    deadline: Option<Duration>,
    fut: F,
) -> Result<F::Output, DeadlineElapsed> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DeadlineElapsed(limit)),
        None => Ok(fut.await),
    }
}
