// src/readiness.rs

//! Fixed-interval polling until a condition holds, with a bounded wait.
//!
//! Used by the pipeline to block the build until the clone step has
//! materialised the source manifest on disk.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::errors::{DocdagError, Result};

/// Re-checks a predicate on a fixed interval until it holds.
#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl ReadinessPoller {
    /// `timeout: None` waits forever.
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }

    /// Resolve once `predicate` returns true.
    ///
    /// The predicate is evaluated immediately, then once per interval.
    /// Between checks the poller sleeps, so concurrent work on the same
    /// runtime keeps running. If the timeout elapses first, the wait is
    /// abandoned with [`DocdagError::Stalled`] naming `what`.
    pub async fn wait_until<F>(&self, what: &str, predicate: F) -> Result<()>
    where
        F: Fn() -> bool + Send,
    {
        let started = Instant::now();
        let mut checks: u64 = 0;

        loop {
            checks += 1;
            if predicate() {
                debug!(what, checks, elapsed = ?started.elapsed(), "condition is ready");
                return Ok(());
            }

            if let Some(timeout) = self.timeout {
                let waited = started.elapsed();
                if waited >= timeout {
                    return Err(DocdagError::Stalled {
                        what: what.to_string(),
                        waited,
                    });
                }
            }

            trace!(what, checks, "condition not ready yet");
            sleep(self.interval).await;
        }
    }
}
