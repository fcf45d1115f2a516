//! Doubling backoff: 1s, 2s, 4s, ... before each retry.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use super::Backoff;

/// Exponential backoff policy.
///
/// The n-th call to [`Backoff::next_delay`] (n starting at 0) yields
/// `2^n` seconds. Without a ceiling the growth is unbounded; the
/// [`with_max_delay`](Self::with_max_delay) and [`with_jitter`](Self::with_jitter)
/// knobs are off by default.
#[derive(Debug)]
pub struct ExponentialBackoff {
    attempts: AtomicU32,
    max_retries: u32,
    max_delay: Option<Duration>,
    jitter: Duration,
}

impl ExponentialBackoff {
    /// Creates an uncapped policy allowing `max_retries` retries.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            max_retries,
            max_delay: None,
            jitter: Duration::ZERO,
        }
    }

    /// Caps every delay at `max_delay` (before jitter).
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Adds a uniformly random `0..=jitter` to every delay.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    fn base_delay(&self, exponent: u32) -> Duration {
        let raw = 1u64
            .checked_shl(exponent)
            .map_or(Duration::MAX, Duration::from_secs);
        match self.max_delay {
            Some(ceiling) => raw.min(ceiling),
            None => raw,
        }
    }

    fn jitter_sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let bound = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::thread_rng().gen_range(0..=bound))
    }
}

impl Backoff for ExponentialBackoff {
    fn should_continue(&self) -> bool {
        self.attempts.load(Ordering::SeqCst) <= self.max_retries
    }

    fn next_delay(&self) -> Duration {
        let exponent = self
            .attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(1))
            })
            .unwrap_or(u32::MAX);
        let delay = self.base_delay(exponent).saturating_add(self.jitter_sample());
        trace!(exponent, delay_ms = delay.as_millis(), "exponential backoff");
        delay
    }

    fn reset(&self) {
        self.attempts.store(0, Ordering::SeqCst);
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}
