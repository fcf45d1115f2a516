//! Channel Puller Core Library
//!
//! This library looks up the channel behind batches of YouTube video pages.
//! Each page is fetched with per-attempt deadlines and a retry policy, the
//! channel address and title are pulled out of the HTML, and one CSV row per
//! input is published atomically once the whole batch is done.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`backoff`] - Retry pacing policies (exponential, fixed interval)
//! - [`fetch`] - Transport abstraction and the retrying fetcher
//! - [`input`] - Resolution of addresses and address-list files into work items
//! - [`extract`] - Channel field extraction from page HTML
//! - [`output`] - CSV rows, staged writing, atomic publication
//! - [`batch`] - Sequential batch driver tying the above together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backoff;
pub mod batch;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod output;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use backoff::{Backoff, BackoffConfig, BackoffKind, DEFAULT_MAX_RETRIES};
pub use batch::{BatchError, BatchProcessor, BatchProgress, BatchReport, BatchStats};
pub use extract::{Extracted, extract};
pub use fetch::{
    DEFAULT_TIMEOUT, FetchConfig, FetchError, HttpTransport, RetryingFetcher, Transport,
    TransportError,
};
pub use input::{InputError, WorkItem, resolve_inputs};
pub use output::{OutputError, OutputRow, StagedCsvWriter};
