//! Staleness comparison between a source file and its mirror copy.
//!
//! Filesystems can record nanoseconds, but copy APIs often round to
//! microseconds or worse, so mtimes are compared after truncation to whole
//! milliseconds. Finer granularity is not portable: microseconds already
//! misbehave on some Windows filesystems.

use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::error::{io_err, SyncError};

/// Whether `mirror` is an up-to-date copy of `source`.
///
/// Up to date ⇔ the mirror exists and its mtime, truncated to milliseconds,
/// is at least the source's. No side effects. A missing source is the
/// caller's precondition violation and surfaces as an I/O error.
pub fn is_current(source: &Path, mirror: &Path) -> Result<bool, SyncError> {
    let mirror_ms = match mtime_millis(mirror) {
        Ok(ms) => ms,
        Err(SyncError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            return Ok(false)
        }
        Err(err) => return Err(err),
    };
    Ok(mirror_ms >= mtime_millis(source)?)
}

/// Modification time of `path` as whole milliseconds since the epoch.
pub(crate) fn mtime_millis(path: &Path) -> Result<u128, SyncError> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| io_err(path, e))?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
    Ok(since_epoch.as_millis())
}

/// Modification time of `path` as fractional seconds, for drift reporting.
pub(crate) fn mtime_secs(path: &Path) -> Result<f64, SyncError> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| io_err(path, e))?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
    Ok(since_epoch.as_secs_f64())
}
