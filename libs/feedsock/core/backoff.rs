//! Reconnect backoff
//!
//! Stateful capped-doubling delay schedule. The delay doubles on every
//! failed attempt up to a hard cap, and resets to the initial value only
//! when a connection actually succeeds. A flapping connection therefore
//! keeps accumulating backoff pressure instead of hammering the upstream.

use std::time::Duration;

/// Capped exponential backoff with a bounded attempt budget
///
/// `next_delay` returns `None` once the budget is exhausted; the caller is
/// expected to stop retrying and surface a terminal failure.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    current_delay: Duration,
    attempts: u32,
}

impl Backoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            initial_delay,
            max_delay,
            max_attempts,
            current_delay: initial_delay,
            attempts: 0,
        }
    }

    /// Consume one attempt and return the delay to wait before retrying
    ///
    /// The schedule from an initial delay `d0` and cap `dmax` is
    /// `d1 = min(dmax, d0 * 2)`, `d2 = min(dmax, d1 * 2)`, ... so it is
    /// monotonically non-decreasing and bounded by `dmax`.
    ///
    /// Returns `None` when the attempt budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        self.current_delay = self.current_delay.saturating_mul(2).min(self.max_delay);
        Some(self.current_delay)
    }

    /// Reset after a successful connect
    pub fn reset(&mut self) {
        self.current_delay = self.initial_delay;
        self.attempts = 0;
    }

    /// Attempts consumed since the last reset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
