//! Mirror-tree synchronization.
//!
//! Two passes per run:
//!
//! 1. **Prune** — remove every mirror entry whose source counterpart no
//!    longer exists (or changed kind).
//! 2. **Copy** — walk the source tree, mirror directories, copy stale or
//!    missing files with their modification timestamps, and collect the
//!    conversion queue.
//!
//! Conversion happens *after* the whole tree is copied so the fixer can
//! resolve local imports; the queue is returned, not processed here.

use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::Serialize;
use walkdir::WalkDir;

use upshift_core::types::EntryKind;

use crate::error::{io_err, SyncError};
use crate::freshness::{self, is_current};

/// Post-copy mtime tolerance in seconds (0.1 ms).
const MTIME_TOLERANCE_SECS: f64 = 0.0001;

/// Knobs for a single-subtree synchronization.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Path relative to the sync root whose files are mirrored but never
    /// queued for conversion.
    pub copy_only: Option<PathBuf>,
}

/// Outcome of one [`synchronize`] run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Files copied this run, relative to the roots.
    pub copied: Vec<PathBuf>,
    /// Mirror entries removed because their source counterpart is gone.
    pub removed: Vec<PathBuf>,
    /// Files already up to date and left untouched.
    pub current: usize,
    /// Mirror files that still need the conversion pass (absolute paths).
    pub queue: Vec<PathBuf>,
}

/// Synchronize `mirror_root` to match `source_root`.
///
/// The mirror root is created if absent; a missing source root is a fatal
/// precondition error. Returns the report including the conversion queue.
pub fn synchronize(
    source_root: &Path,
    mirror_root: &Path,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    if !source_root.is_dir() {
        return Err(SyncError::MissingSourceRoot {
            path: source_root.to_path_buf(),
        });
    }
    std::fs::create_dir_all(mirror_root).map_err(|e| io_err(mirror_root, e))?;

    let mut report = SyncReport::default();
    prune(source_root, mirror_root, &mut report)?;
    copy_tree(source_root, mirror_root, options, &mut report)?;
    Ok(report)
}

/// Remove every mirror entry with no source counterpart of the same kind.
///
/// Checking the counterpart's kind, not just its existence, means a
/// directory-vs-file swap in the source is pruned here and recreated by the
/// copy pass within the same run. Removed directories are not descended
/// into.
fn prune(source_root: &Path, mirror_root: &Path, report: &mut SyncReport) -> Result<(), SyncError> {
    let mut entries = WalkDir::new(mirror_root).min_depth(1).into_iter();
    while let Some(entry) = entries.next() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(mirror_root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let counterpart = source_root.join(&rel);

        if entry.file_type().is_dir() {
            if !counterpart.is_dir() {
                tracing::info!("removing {}", entry.path().display());
                std::fs::remove_dir_all(entry.path()).map_err(|e| io_err(entry.path(), e))?;
                entries.skip_current_dir();
                report.removed.push(rel);
            }
        } else if !counterpart.is_file() {
            tracing::info!("removing {}", entry.path().display());
            std::fs::remove_file(entry.path()).map_err(|e| io_err(entry.path(), e))?;
            report.removed.push(rel);
        }
    }
    Ok(())
}

/// Walk the source tree in sorted order, mirroring directories and copying
/// stale or missing files.
fn copy_tree(
    source_root: &Path,
    mirror_root: &Path,
    options: &SyncOptions,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    for entry in WalkDir::new(source_root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        // strip_prefix also drops a leading `.` component when the source
        // root is the working directory, keeping reported paths clean.
        let rel = entry
            .path()
            .strip_prefix(source_root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let target = mirror_root.join(&rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
            continue;
        }

        let kind = EntryKind::of(&entry.file_name().to_string_lossy());
        if kind == EntryKind::Ignored {
            tracing::debug!("ignoring {}", rel.display());
            continue;
        }

        if is_current(entry.path(), &target)? {
            tracing::debug!("current: {}", target.display());
            report.current += 1;
            continue;
        }

        copy_with_mtime(entry.path(), &target)?;
        tracing::info!("updated {}", target.display());
        if kind == EntryKind::Source && !in_copy_only(&rel, options) {
            report.queue.push(target);
        }
        report.copied.push(rel);
    }
    Ok(())
}

fn in_copy_only(rel: &Path, options: &SyncOptions) -> bool {
    options
        .copy_only
        .as_deref()
        .is_some_and(|dir| rel.starts_with(dir))
}

/// Copy bytes and modification time, then verify the applied timestamp.
///
/// Drift beyond 0.1 ms means the host is not preserving timestamps and the
/// staleness check would misfire on every later run, so it is fatal.
fn copy_with_mtime(source: &Path, mirror: &Path) -> Result<(), SyncError> {
    std::fs::copy(source, mirror).map_err(|e| io_err(mirror, e))?;

    let modified = std::fs::metadata(source)
        .and_then(|meta| meta.modified())
        .map_err(|e| io_err(source, e))?;
    filetime::set_file_mtime(mirror, FileTime::from_system_time(modified))
        .map_err(|e| io_err(mirror, e))?;

    let source_mtime = freshness::mtime_secs(source)?;
    let mirror_mtime = freshness::mtime_secs(mirror)?;
    if (source_mtime - mirror_mtime).abs() >= MTIME_TOLERANCE_SECS {
        return Err(SyncError::TimestampDrift {
            path: mirror.to_path_buf(),
            source_mtime,
            mirror_mtime,
        });
    }
    Ok(())
}
