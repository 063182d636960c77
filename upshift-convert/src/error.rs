//! Error types for upshift-convert.

use std::path::PathBuf;

use thiserror::Error;

use upshift_sync::SyncError;

/// All errors that can arise from the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An error from tree synchronization.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// The external fixer reported a nonzero status for a file. The
    /// partially-transformed mirror copy has already been deleted; the next
    /// run re-copies and re-converts it.
    #[error("fixer exited with status {status} on {path}")]
    TransformFailed {
        path: PathBuf,
        status: i32,
        /// Captured fixer output, dumped by the caller only on failure so
        /// successful runs stay quiet.
        diagnostics: String,
    },

    /// Cancellation observed between work units. The in-flight file and
    /// every queued-but-unstarted file have been deleted.
    #[error("interrupted during {path}")]
    Interrupted { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`ConvertError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConvertError {
    ConvertError::Io {
        path: path.into(),
        source,
    }
}
