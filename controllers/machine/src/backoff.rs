//! Fibonacci requeue backoff.
//!
//! Failed reconciles are re-attempted by the watch loop; this backoff
//! spaces consecutive failures out along the Fibonacci sequence so a
//! persistently broken machine does not hammer the provider API.
//! Sequence with the defaults: 1s, 1s, 2s, 3s, 5s, ... capped at 60s,
//! reset to the start after the next successful reconcile.

use std::time::Duration;

/// Fibonacci backoff calculator for reconcile requeues
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_seconds: u64,
    prev_seconds: u64,
    current_seconds: u64,
    max_seconds: u64,
}

impl FibonacciBackoff {
    /// Create a backoff with the given minimum and cap, both in seconds.
    #[must_use]
    pub fn new(min_seconds: u64, max_seconds: u64) -> Self {
        Self {
            min_seconds,
            prev_seconds: 0,
            current_seconds: min_seconds,
            max_seconds,
        }
    }

    /// Next delay in the sequence, advancing the internal state.
    pub fn next_backoff(&mut self) -> Duration {
        let result = Duration::from_secs(self.current_seconds);

        let next = self.prev_seconds + self.current_seconds;
        self.prev_seconds = self.current_seconds;
        self.current_seconds = next.min(self.max_seconds);

        result
    }

    /// Reset to the start of the sequence after a success.
    pub fn reset(&mut self) {
        self.prev_seconds = 0;
        self.current_seconds = self.min_seconds;
    }
}
