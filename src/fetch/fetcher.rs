//! Retrying fetch of a single document.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{FetchError, Interruption, TransportError};
use super::transport::{ResponseBody, Transport};
use crate::backoff::{Backoff, BackoffConfig};

/// Default per-attempt timeout (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`RetryingFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Deadline for one attempt, covering headers and body.
    pub timeout: Duration,
    /// Policy built fresh for every fetch.
    pub backoff: BackoffConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            backoff: BackoffConfig::default(),
        }
    }
}

/// A successfully fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Raw response body.
    pub body: Vec<u8>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

impl Fetched {
    /// Attempts beyond the first.
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

enum AttemptOutcome {
    Sent(Box<dyn ResponseBody>),
    Interrupted(Interruption),
    Failed(TransportError),
}

/// Fetches documents, retrying only attempts that time out or are cancelled.
///
/// # Retry Behavior
///
/// - Each attempt runs under its own deadline (`timeout` from now), raced
///   against the run-wide cancellation token
/// - A deadline, a transport-reported timeout, or a cancellation counts as an
///   interruption and is retried after the policy's delay
/// - Any other transport error (DNS, connection refused, HTTP 4xx/5xx) is
///   returned immediately
/// - Once headers arrive the body is read under the same deadline; a failed or
///   interrupted read is returned without retry
/// - When the policy runs out, [`FetchError::RetriesExhausted`] carries the
///   last interruption
///
/// The delay before the next attempt is skipped once the policy says no
/// further attempt is allowed, and is cut short by cancellation.
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    config: FetchConfig,
    cancel: CancellationToken,
}

impl RetryingFetcher {
    /// Creates a fetcher with its own (never cancelled) token.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: FetchConfig) -> Self {
        Self {
            transport,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Observes `cancel` on every attempt and backoff delay.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the cancellation token observed by this fetcher.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fetches `url` with a freshly built backoff policy.
    ///
    /// # Errors
    ///
    /// See [`fetch_with_policy`](Self::fetch_with_policy).
    pub async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        let policy = self.config.backoff.build();
        self.fetch_with_policy(url, policy.as_ref()).await
    }

    /// Fetches `url`, pacing retries with the supplied policy.
    ///
    /// The policy is used as-is; callers reusing one across fetches must
    /// [`reset`](Backoff::reset) it in between.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` does not parse (no attempt is made)
    /// - [`FetchError::NoAttemptAllowed`] if the policy is already exhausted
    /// - [`FetchError::Transport`] for the first non-timeout transport failure
    /// - [`FetchError::ReadInterrupted`] if the body read hits the deadline or cancellation
    /// - [`FetchError::RetriesExhausted`] once every permitted attempt was interrupted
    #[instrument(skip(self, policy), fields(url = %url))]
    pub async fn fetch_with_policy(
        &self,
        url: &str,
        policy: &dyn Backoff,
    ) -> Result<Fetched, FetchError> {
        let target = Url::parse(url).map_err(|e| FetchError::invalid_url(url, e.to_string()))?;

        let mut attempts: u32 = 0;
        let mut last = None;

        while policy.should_continue() {
            attempts += 1;
            // A timeout too large to represent as an instant means no deadline.
            let deadline = Instant::now().checked_add(self.config.timeout);

            match self.attempt(&target, deadline).await {
                AttemptOutcome::Sent(body) => {
                    let body = self.read_body(&target, body, deadline, attempts).await?;
                    debug!(attempts, bytes = body.len(), "fetch complete");
                    return Ok(Fetched { body, attempts });
                }
                AttemptOutcome::Failed(error) => {
                    debug!(attempts, error = %error, "fetch failed without retry");
                    return Err(FetchError::transport(attempts, error));
                }
                AttemptOutcome::Interrupted(interruption) => {
                    last = Some(interruption);
                    let delay = policy.wait();
                    if !policy.should_continue() {
                        break;
                    }
                    warn!(
                        attempt = attempts,
                        cause = %interruption,
                        "fetch attempt interrupted, retrying"
                    );
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => {}
                        () = delay => {}
                    }
                }
            }
        }

        let Some(last) = last else {
            warn!("backoff policy exhausted before the first attempt");
            return Err(FetchError::no_attempt_allowed(url));
        };
        warn!(attempts, cause = %last, "retry limit exceeded");
        Err(FetchError::retries_exhausted(url, attempts, last))
    }

    async fn attempt(&self, target: &Url, deadline: Option<Instant>) -> AttemptOutcome {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => AttemptOutcome::Interrupted(Interruption::Cancelled),
            result = until(deadline, self.transport.send(target)) => match result {
                None => {
                    AttemptOutcome::Interrupted(Interruption::DeadlineExceeded(self.config.timeout))
                }
                Some(Err(error)) if error.is_timeout() => {
                    AttemptOutcome::Interrupted(Interruption::TransportTimeout)
                }
                Some(Err(error)) => AttemptOutcome::Failed(error),
                Some(Ok(body)) => AttemptOutcome::Sent(body),
            },
        }
    }

    async fn read_body(
        &self,
        target: &Url,
        body: Box<dyn ResponseBody>,
        deadline: Option<Instant>,
        attempts: u32,
    ) -> Result<Vec<u8>, FetchError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(FetchError::read_interrupted(
                target.as_str(),
                attempts,
                Interruption::Cancelled,
            )),
            result = until(deadline, body.read_all()) => match result {
                None => Err(FetchError::read_interrupted(
                    target.as_str(),
                    attempts,
                    Interruption::DeadlineExceeded(self.config.timeout),
                )),
                Some(read) => read.map_err(|e| FetchError::transport(attempts, e)),
            },
        }
    }
}

/// Runs `future` until `deadline`, or to completion when there is none.
///
/// Returns `None` if the deadline passed first.
async fn until<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}
