//! Error types for staged output.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors while staging or publishing the result file.
///
/// Any of these aborts the run; the destination is left as it was.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The staging file could not be created next to the destination.
    #[error("cannot create staging file in {dir}: {source}")]
    Stage {
        /// Directory the staging file was meant to live in.
        dir: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to the staging file failed.
    #[error("IO error writing staged output for {path}: {source}")]
    Write {
        /// Final destination of the output.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Flushing, syncing or renaming the staging file failed.
    #[error("failed to publish output to {path}: {source}")]
    Publish {
        /// Final destination of the output.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    /// Creates a staging error.
    pub fn stage(dir: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stage {
            dir: dir.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a publish error.
    pub fn publish(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Publish {
            path: path.into(),
            source,
        }
    }
}
