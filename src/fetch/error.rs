//! Error types for the fetch module.
//!
//! Only [`Interruption`]s are retried; everything else is reported as-is.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by a [`Transport`](super::Transport) for a single attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The transport gave up waiting on its own timer.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL being fetched.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response started but the body could not be read.
    #[error("failed reading response body from {url}: {source}")]
    Body {
        /// The URL being fetched.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Returns true when the transport itself reported a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Why an attempt stopped before the transport answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interruption {
    /// The per-attempt deadline elapsed.
    #[error("attempt exceeded the {0:?} deadline")]
    DeadlineExceeded(Duration),

    /// The run-wide cancellation token fired.
    #[error("attempt cancelled")]
    Cancelled,

    /// The transport reported its own timeout.
    #[error("transport timed out")]
    TransportTimeout,
}

/// Errors from one logical fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target could not be parsed as a URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A non-retryable transport failure.
    #[error("{source}")]
    Transport {
        /// Attempts made, including the failed one.
        attempts: u32,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// The response arrived but reading its body hit the deadline or a cancellation.
    #[error("reading response body from {url} interrupted: {cause}")]
    ReadInterrupted {
        /// The URL being fetched.
        url: String,
        /// Attempts made, including the one whose read was cut short.
        attempts: u32,
        /// What stopped the read.
        #[source]
        cause: Interruption,
    },

    /// The policy allowed no attempt at all.
    #[error("retry policy allowed no attempt fetching {url}")]
    NoAttemptAllowed {
        /// The URL that was not fetched.
        url: String,
    },

    /// Every permitted attempt was interrupted.
    #[error("retry limit exceeded after {attempts} attempts fetching {url}: {last}")]
    RetriesExhausted {
        /// The URL being fetched.
        url: String,
        /// Attempts made, including the first.
        attempts: u32,
        /// The interruption that ended the final attempt.
        #[source]
        last: Interruption,
    },
}

impl FetchError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a transport error after `attempts` attempts.
    pub fn transport(attempts: u32, source: TransportError) -> Self {
        Self::Transport { attempts, source }
    }

    /// Creates a body read interruption error.
    pub fn read_interrupted(url: impl Into<String>, attempts: u32, cause: Interruption) -> Self {
        Self::ReadInterrupted {
            url: url.into(),
            attempts,
            cause,
        }
    }

    /// Creates an error for a policy that was exhausted before the first attempt.
    pub fn no_attempt_allowed(url: impl Into<String>) -> Self {
        Self::NoAttemptAllowed { url: url.into() }
    }

    /// Creates a retries-exhausted error.
    pub fn retries_exhausted(url: impl Into<String>, attempts: u32, last: Interruption) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            attempts,
            last,
        }
    }

    /// Attempts made before the error, including the final one.
    ///
    /// Zero when the URL was rejected or the policy allowed no attempt.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::InvalidUrl { .. } | Self::NoAttemptAllowed { .. } => 0,
            Self::Transport { attempts, .. }
            | Self::ReadInterrupted { attempts, .. }
            | Self::RetriesExhausted { attempts, .. } => *attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_http_status_display() {
        let error = TransportError::http_status("https://www.youtube.com/watch?v=x", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://www.youtube.com/watch?v=x"),
            "Expected URL in: {msg}"
        );
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_transport_error_timeout_is_timeout() {
        let error = TransportError::timeout("https://www.youtube.com/watch?v=x");
        assert!(error.is_timeout());
        assert!(error.to_string().contains("timeout"));
    }

    #[test]
    fn test_fetch_error_transport_displays_source() {
        let error = FetchError::transport(3, TransportError::http_status("https://a.test/", 503));
        assert_eq!(error.to_string(), "HTTP 503 fetching https://a.test/");
        assert_eq!(error.attempts(), 3);
    }

    #[test]
    fn test_fetch_error_attempts_per_variant() {
        assert_eq!(FetchError::invalid_url("x", "bad").attempts(), 0);
        assert_eq!(FetchError::no_attempt_allowed("https://a.test/").attempts(), 0);
        assert_eq!(
            FetchError::read_interrupted("https://a.test/", 2, Interruption::Cancelled).attempts(),
            2
        );
        assert_eq!(
            FetchError::retries_exhausted("https://a.test/", 6, Interruption::Cancelled).attempts(),
            6
        );
    }

    #[test]
    fn test_fetch_error_no_attempt_allowed_display() {
        let msg = FetchError::no_attempt_allowed("https://a.test/").to_string();
        assert!(msg.contains("no attempt"), "got: {msg}");
        assert!(!msg.contains("deadline"), "got: {msg}");
    }

    #[test]
    fn test_fetch_error_retries_exhausted_display() {
        let error = FetchError::retries_exhausted(
            "https://a.test/",
            6,
            Interruption::DeadlineExceeded(Duration::from_secs(10)),
        );
        let msg = error.to_string();
        assert!(msg.starts_with("retry limit exceeded"), "got: {msg}");
        assert!(msg.contains("6 attempts"), "got: {msg}");
        assert!(msg.contains("10s"), "got: {msg}");
    }

    #[test]
    fn test_fetch_error_invalid_url_display() {
        let error = FetchError::invalid_url("not a url", "relative URL without a base");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "got: {msg}");
        assert!(msg.contains("not a url"), "got: {msg}");
    }
}
