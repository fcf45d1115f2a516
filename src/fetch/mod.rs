//! Resilient HTTP fetching for single documents.
//!
//! This module provides the [`RetryingFetcher`], which applies a
//! [`Backoff`](crate::backoff::Backoff) policy across bounded per-attempt
//! deadlines, and the [`Transport`] seam it talks through.
//!
//! # Features
//!
//! - Per-attempt deadline covering both headers and body (10s by default)
//! - Only timeouts and cancellations are retried
//! - Run-wide cancellation through a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! - reqwest-backed [`HttpTransport`] shared across the whole run
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use channel_puller::fetch::{FetchConfig, HttpTransport, RetryingFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new()?);
//! let fetcher = RetryingFetcher::new(transport, FetchConfig::default());
//! let fetched = fetcher.fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//! println!("{} bytes after {} attempts", fetched.body.len(), fetched.attempts);
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
mod transport;

pub use error::{FetchError, Interruption, TransportError};
pub use fetcher::{DEFAULT_TIMEOUT, FetchConfig, Fetched, RetryingFetcher};
pub use transport::{CONNECT_TIMEOUT_SECS, HttpTransport, ResponseBody, Transport};
