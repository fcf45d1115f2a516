//! Sequential batch driver.
//!
//! # Overview
//!
//! [`BatchProcessor`] walks resolved [`WorkItem`]s in order, fetches each valid
//! one with a [`RetryingFetcher`], extracts the channel fields and writes
//! exactly one [`OutputRow`] per item. Per-item failures become row error text;
//! only output failures and cancellation abort the batch.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use channel_puller::batch::BatchProcessor;
//! use channel_puller::fetch::{FetchConfig, HttpTransport, RetryingFetcher};
//! use channel_puller::input::resolve_inputs;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let items = resolve_inputs(&["https://www.youtube.com/watch?v=abc"])?;
//! let transport = Arc::new(HttpTransport::new()?);
//! let processor = BatchProcessor::new(RetryingFetcher::new(transport, FetchConfig::default()));
//! let report = processor.process_to_file(&items, "channels.csv", &()).await?;
//! println!("{} rows written to {}", report.stats.total(), report.path.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::extract::extract;
use crate::fetch::RetryingFetcher;
use crate::input::WorkItem;
use crate::output::{OutputError, OutputRow, RowSink, StagedCsvWriter};

/// Fatal batch errors. Nothing is published when one of these is returned.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Staging or publishing the output failed.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// The run was cancelled before every item was processed.
    #[error("batch cancelled after {processed} of {total} items")]
    Cancelled {
        /// Items whose rows were written before cancellation.
        processed: usize,
        /// Items in the batch.
        total: usize,
    },
}

/// Per-item notifications, one call per processed item.
pub trait BatchProgress: Send + Sync {
    /// Called before an item is processed.
    fn item_started(&self, _index: usize, _item: &WorkItem) {}

    /// Called once the row for an item has been written.
    fn item_finished(&self, index: usize, row: &OutputRow);
}

impl BatchProgress for () {
    fn item_finished(&self, _index: usize, _row: &OutputRow) {}
}

/// Counters for a processed batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    succeeded: usize,
    failed: usize,
    invalid: usize,
    retried: usize,
}

impl BatchStats {
    /// Creates a tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items fetched successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Valid items whose fetch failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Items rejected during input resolution.
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    /// Retry attempts made across all items.
    #[must_use]
    pub fn retried(&self) -> usize {
        self.retried
    }

    /// Rows written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.invalid
    }

    /// Rows carrying error text.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.failed + self.invalid
    }

    fn record_retries(&mut self, retries: u32) {
        self.retried += usize::try_from(retries).unwrap_or(usize::MAX);
    }
}

/// Result of [`BatchProcessor::process_to_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Where the output was published.
    pub path: PathBuf,
    /// Counters for the run.
    pub stats: BatchStats,
}

/// Drives a batch of work items through the fetcher, one at a time.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    fetcher: RetryingFetcher,
}

impl BatchProcessor {
    /// Creates a processor around a configured fetcher.
    ///
    /// The fetcher's cancellation token is also checked between items.
    #[must_use]
    pub fn new(fetcher: RetryingFetcher) -> Self {
        Self { fetcher }
    }

    /// Returns the underlying fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    /// Processes `items` in order, writing one row per item to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Output`] as soon as a row cannot be written and
    /// [`BatchError::Cancelled`] if the cancellation token trips. Item-level
    /// failures are never errors here; they become row error text.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn process<S>(
        &self,
        items: &[WorkItem],
        sink: &mut S,
        progress: &dyn BatchProgress,
    ) -> Result<BatchStats, BatchError>
    where
        S: RowSink + ?Sized,
    {
        let mut stats = BatchStats::new();
        let total = items.len();
        info!(total, "starting batch");

        for (index, item) in items.iter().enumerate() {
            self.ensure_not_cancelled(index, total)?;
            progress.item_started(index, item);

            let row = self.process_item(item, &mut stats).await;
            sink.write_row(&row)?;
            progress.item_finished(index, &row);
        }

        // A fetch cut short by cancellation still yields a row; do not let it publish.
        self.ensure_not_cancelled(total, total)?;

        info!(
            succeeded = stats.succeeded(),
            failed = stats.failed(),
            invalid = stats.invalid(),
            retried = stats.retried(),
            "batch complete"
        );
        Ok(stats)
    }

    /// Stages output beside `destination`, processes `items`, then publishes.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] on any fatal error; the destination is left
    /// untouched in that case.
    pub async fn process_to_file(
        &self,
        items: &[WorkItem],
        destination: impl Into<PathBuf>,
        progress: &dyn BatchProgress,
    ) -> Result<BatchReport, BatchError> {
        let mut writer = StagedCsvWriter::create(destination)?;
        let stats = self.process(items, &mut writer, progress).await?;
        let path = writer.publish()?;
        Ok(BatchReport { path, stats })
    }

    async fn process_item(&self, item: &WorkItem, stats: &mut BatchStats) -> OutputRow {
        if let Some(reason) = item.error() {
            debug!(source = item.source(), reason, "skipping invalid item");
            stats.invalid += 1;
            return OutputRow::failure(item.source(), reason);
        }

        match self.fetcher.fetch(item.source()).await {
            Ok(fetched) => {
                stats.succeeded += 1;
                stats.record_retries(fetched.retries());
                let fields = extract(&fetched.body);
                debug!(
                    source = item.source(),
                    channel = %fields.channel_url,
                    title = %fields.title,
                    "extracted"
                );
                OutputRow::success(item.source(), fields)
            }
            Err(err) => {
                stats.failed += 1;
                stats.record_retries(err.attempts().saturating_sub(1));
                warn!(source = item.source(), error = %err, "fetch failed");
                OutputRow::failure(item.source(), err.to_string())
            }
        }
    }

    fn ensure_not_cancelled(&self, processed: usize, total: usize) -> Result<(), BatchError> {
        if self.fetcher.cancellation().is_cancelled() {
            warn!(processed, total, "batch cancelled");
            return Err(BatchError::Cancelled { processed, total });
        }
        Ok(())
    }
}
