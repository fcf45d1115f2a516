//! Error types for input resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors while expanding command-line inputs.
///
/// Per-address problems are not errors here; they become invalid
/// [`WorkItem`](super::WorkItem)s.
#[derive(Debug, Error)]
pub enum InputError {
    /// An input file could not be opened or read.
    #[error("cannot read input file {path}: {source}")]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An input file lists itself, directly or through other files.
    #[error("input file {path} includes itself")]
    Cycle {
        /// The file reached a second time.
        path: PathBuf,
    },
}

impl InputError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a cycle error.
    pub fn cycle(path: impl Into<PathBuf>) -> Self {
        Self::Cycle { path: path.into() }
    }
}
