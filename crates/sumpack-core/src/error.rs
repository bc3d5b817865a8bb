//! Error types for the checksum/package pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SumpackError>;

/// Errors surfaced by the core pipeline. Nothing is retried or downgraded:
/// each kind aborts the current file and, under fail-fast, the whole batch.
#[derive(Debug, Error)]
pub enum SumpackError {
    /// Requested algorithm has no registered hash capability.
    #[error("unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The requested combination of options cannot run (e.g. archiving
    /// without sidecar files).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Filesystem failure while reading a source, writing a sidecar, or
    /// composing an archive.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SumpackError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SumpackError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
