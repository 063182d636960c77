//! Error types for upshift-sync.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from mirror synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source root to mirror does not exist. Fatal precondition;
    /// nothing has been mutated.
    #[error("source root {path} does not exist")]
    MissingSourceRoot { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failure (unreadable entry, dangling link, ...).
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Post-copy timestamp drift beyond tolerance. The copy primitive on
    /// this host is not preserving modification times, so the staleness
    /// comparison cannot be trusted; not retried.
    #[error("modified time not copied for {path}: {source_mtime:.8} vs {mirror_mtime:.8}")]
    TimestampDrift {
        path: PathBuf,
        source_mtime: f64,
        mirror_mtime: f64,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
