//! Retry pacing policies for transient fetch failures.
//!
//! A [`Backoff`] tracks how many attempts a single logical operation has made
//! and decides whether another one is allowed and how long to wait before it.
//!
//! # Overview
//!
//! Two policies are provided:
//! - [`ExponentialBackoff`] - waits `2^n` seconds before the n-th retry
//!   (n starting at 0), optionally capped and jittered
//! - [`FixedIntervalBackoff`] - waits a constant interval (or not at all)
//!
//! Policies are selected at construction time through [`BackoffConfig`], so
//! callers only ever hold a `Box<dyn Backoff>`.
//!
//! # Example
//!
//! ```
//! use channel_puller::backoff::{Backoff, BackoffConfig};
//!
//! # async fn example() {
//! let policy = BackoffConfig::exponential(3).build();
//! while policy.should_continue() {
//!     // ... attempt the operation, break on success ...
//!     policy.wait().await;
//! }
//! # }
//! ```

mod exponential;
mod fixed;

use std::fmt;
use std::time::Duration;

use tokio::time::Sleep;

pub use exponential::ExponentialBackoff;
pub use fixed::FixedIntervalBackoff;

/// Default maximum number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default interval for the fixed policy (1 second).
pub const DEFAULT_FIXED_INTERVAL: Duration = Duration::from_secs(1);

/// Retry pacing for one logical operation.
///
/// Counters use atomics, so a policy can be shared behind `&self` between
/// tasks without the count drifting. Sharing one instance across unrelated
/// operations is still wrong: earlier retries would count against later ones.
/// Build a fresh policy (or call [`reset`](Backoff::reset)) per operation.
pub trait Backoff: Send + Sync + fmt::Debug {
    /// Returns true while the number of recorded waits is within the retry bound.
    fn should_continue(&self) -> bool;

    /// Records one attempt and returns how long to wait before the next one.
    fn next_delay(&self) -> Duration;

    /// Resets the attempt counter to zero.
    fn reset(&self);

    /// Number of waits recorded since construction or the last reset.
    fn attempts(&self) -> u32;

    /// Records one attempt and returns a timer that fires after the delay.
    ///
    /// The counter moves when this is called, not when the timer is polled,
    /// so a caller may drop the timer unawaited after checking
    /// [`should_continue`](Backoff::should_continue).
    fn wait(&self) -> Sleep {
        tokio::time::sleep(self.next_delay())
    }
}

/// Which backoff strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffKind {
    /// Doubling delay: 1s, 2s, 4s, ...
    #[default]
    Exponential,
    /// Constant delay between attempts.
    Fixed,
}

impl fmt::Display for BackoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential => write!(f, "exponential"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

/// Construction parameters for a backoff policy.
///
/// # Default Values
///
/// - `kind`: exponential
/// - `max_retries`: 5
/// - `interval`: 1 second (fixed policy only)
/// - `max_delay`: none (exponential delays are uncapped)
/// - `jitter`: zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Strategy to build.
    pub kind: BackoffKind,
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Constant wait for [`BackoffKind::Fixed`].
    pub interval: Duration,
    /// Ceiling for exponential delays.
    pub max_delay: Option<Duration>,
    /// Upper bound of random delay added to each exponential wait.
    pub jitter: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            kind: BackoffKind::Exponential,
            max_retries: DEFAULT_MAX_RETRIES,
            interval: DEFAULT_FIXED_INTERVAL,
            max_delay: None,
            jitter: Duration::ZERO,
        }
    }
}

impl BackoffConfig {
    /// Exponential policy with the given retry bound and no cap or jitter.
    #[must_use]
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Fixed-interval policy.
    #[must_use]
    pub fn fixed(interval: Duration, max_retries: u32) -> Self {
        Self {
            kind: BackoffKind::Fixed,
            max_retries,
            interval,
            ..Self::default()
        }
    }

    /// Sets a ceiling on exponential delays.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the jitter bound added to exponential delays.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Builds a fresh policy with a zeroed counter.
    #[must_use]
    pub fn build(&self) -> Box<dyn Backoff> {
        match self.kind {
            BackoffKind::Exponential => Box::new(
                ExponentialBackoff::new(self.max_retries)
                    .with_max_delay(self.max_delay)
                    .with_jitter(self.jitter),
            ),
            BackoffKind::Fixed => Box::new(FixedIntervalBackoff::new(
                self.interval,
                self.max_retries,
            )),
        }
    }
}
