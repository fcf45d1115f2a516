//! Constant-interval backoff.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::Backoff;

/// Waits the same interval before every retry.
///
/// A zero interval makes [`Backoff::wait`] resolve immediately, which turns
/// the policy into a plain attempt counter.
#[derive(Debug)]
pub struct FixedIntervalBackoff {
    interval: Duration,
    attempts: AtomicU32,
    max_retries: u32,
}

impl FixedIntervalBackoff {
    /// Creates a policy waiting `interval` between attempts, allowing `max_retries` retries.
    #[must_use]
    pub fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            attempts: AtomicU32::new(0),
            max_retries,
        }
    }

    /// Returns the configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Backoff for FixedIntervalBackoff {
    fn should_continue(&self) -> bool {
        self.attempts.load(Ordering::SeqCst) <= self.max_retries
    }

    fn next_delay(&self) -> Duration {
        let _ = self
            .attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(1))
            });
        self.interval
    }

    fn reset(&self) {
        self.attempts.store(0, Ordering::SeqCst);
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn test_fixed_allows_max_plus_one_attempts() {
        let policy = FixedIntervalBackoff::new(Duration::ZERO, 4);
        let mut attempts = 0;
        while policy.should_continue() {
            attempts += 1;
            let _ = policy.next_delay();
        }
        assert_eq!(attempts, 5);
    }

    #[test]
    fn test_fixed_delay_is_constant() {
        let policy = FixedIntervalBackoff::new(Duration::from_millis(750), 10);
        for _ in 0..5 {
            assert_eq!(policy.next_delay(), Duration::from_millis(750));
        }
        assert_eq!(policy.interval(), Duration::from_millis(750));
    }

    #[test]
    fn test_fixed_reset_restores_continue() {
        let policy = FixedIntervalBackoff::new(Duration::from_secs(1), 1);
        let _ = policy.next_delay();
        let _ = policy.next_delay();
        assert!(!policy.should_continue());

        policy.reset();
        assert!(policy.should_continue());
        assert_eq!(policy.attempts(), 0);
        assert_eq!(policy.next_delay(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_fixed_wait_blocks_for_interval() {
        tokio::time::pause();

        let policy = FixedIntervalBackoff::new(Duration::from_secs(2), 3);
        for _ in 0..3 {
            let start = Instant::now();
            policy.wait().await;
            assert!(start.elapsed() >= Duration::from_secs(2));
            assert!(start.elapsed() < Duration::from_millis(2100));
        }
        assert_eq!(policy.attempts(), 3);
    }

    #[tokio::test]
    async fn test_fixed_zero_interval_resolves_immediately() {
        tokio::time::pause();

        let policy = FixedIntervalBackoff::new(Duration::ZERO, 3);
        let start = Instant::now();
        policy.wait().await;
        policy.wait().await;
        assert!(start.elapsed() < Duration::from_millis(10));
        assert_eq!(policy.attempts(), 2);
    }
}
