//! Progress bar for batch runs.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use channel_puller::batch::BatchProgress;
use channel_puller::input::WorkItem;
use channel_puller::output::OutputRow;

/// Reports batch progress on stderr.
///
/// When disabled the bar is hidden, so callers never need to branch.
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new(enabled: bool, total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(u64::try_from(total).unwrap_or(u64::MAX)),
            if enabled {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchProgress for BarProgress {
    fn item_started(&self, _index: usize, item: &WorkItem) {
        self.bar.set_message(item.source().to_string());
        self.bar.tick();
    }

    fn item_finished(&self, _index: usize, row: &OutputRow) {
        if row.is_error() {
            self.bar.println(format!("{}: {}", row.source, row.error));
        }
        self.bar.inc(1);
    }
}
