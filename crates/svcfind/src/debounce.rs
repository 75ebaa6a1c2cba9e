//! Quiet-period rate limiting for live queries

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Holds the latest value until `wait` has passed without a newer one.
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.wait));
    }

    /// True when a value is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the quiet period to end and take the value.
    ///
    /// Cancel safe: dropping the future leaves the value pending.
    pub async fn ready(&mut self) -> Option<T> {
        let deadline = self.pending.as_ref()?.1;
        sleep_until(deadline).await;
        self.pending.take().map(|(value, _)| value)
    }

    /// Take the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
