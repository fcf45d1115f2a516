//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use channel_puller::backoff::{BackoffConfig, BackoffKind, DEFAULT_MAX_RETRIES};
use channel_puller::fetch::{DEFAULT_TIMEOUT, FetchConfig};

/// Look up the channel behind YouTube video pages.
///
/// Each input is either a video address or a text file listing addresses
/// (one per line, files may list further files). Results are written as CSV,
/// one row per address, in input order.
#[derive(Parser, Debug)]
#[command(name = "channel-puller")]
#[command(author, version, about)]
pub struct Args {
    /// Video addresses or files listing them
    pub inputs: Vec<String>,

    /// Output CSV path [default: youtube_YYYYMMDD.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-attempt timeout in seconds (1-600)
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Maximum retries after a timed-out attempt (0-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: u8,

    /// Delay strategy between retries
    #[arg(long, value_enum, default_value_t = BackoffArg::Exponential)]
    pub backoff: BackoffArg,

    /// Delay between retries in milliseconds for the fixed strategy (max 600000)
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(0..=600_000))]
    pub interval_ms: u64,

    /// Ceiling for exponential delays in seconds (0 for none)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=86_400))]
    pub max_delay: u64,

    /// Random extra delay of up to this many milliseconds per exponential wait
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub jitter_ms: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Retry delay strategies selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffArg {
    /// 1s, 2s, 4s, ...
    Exponential,
    /// Constant --interval-ms
    Fixed,
}

impl From<BackoffArg> for BackoffKind {
    fn from(arg: BackoffArg) -> Self {
        match arg {
            BackoffArg::Exponential => Self::Exponential,
            BackoffArg::Fixed => Self::Fixed,
        }
    }
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Output path, falling back to a dated name in the working directory.
    pub fn output_path(&self, today: NaiveDate) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("youtube_{}.csv", today.format("%Y%m%d"))))
    }

    /// Fetch settings derived from the timeout and backoff flags.
    pub fn fetch_config(&self) -> FetchConfig {
        let max_retries = u32::from(self.max_retries);
        let backoff = match BackoffKind::from(self.backoff) {
            BackoffKind::Exponential => BackoffConfig::exponential(max_retries)
                .with_max_delay((self.max_delay > 0).then(|| Duration::from_secs(self.max_delay)))
                .with_jitter(Duration::from_millis(self.jitter_ms)),
            BackoffKind::Fixed => {
                BackoffConfig::fixed(Duration::from_millis(self.interval_ms), max_retries)
            }
        };
        FetchConfig {
            timeout: Duration::from_secs(self.timeout),
            backoff,
        }
    }
}
