//! Conversion batch runner.
//!
//! All-or-nothing per file: a file is either left fully converted or it is
//! deleted, so the next run's staleness check re-copies it instead of
//! trusting a half-edited copy. A hard failure aborts the whole remaining
//! batch; cancellation additionally discards every file not yet started.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cancel::CancelToken;
use crate::error::ConvertError;
use crate::prepass;
use crate::transformer::Transformer;

/// How many timings [`ConvertReport::slow_outliers`] reports.
const SLOW_REPORT_LEN: usize = 5;

/// Wall time spent converting one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileTiming {
    pub path: PathBuf,
    pub elapsed: Duration,
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertReport {
    /// Fully converted files, in processing order.
    pub converted: Vec<PathBuf>,
    pub timings: Vec<FileTiming>,
}

impl ConvertReport {
    /// The slowest conversions, slowest first, when the slowest exceeded
    /// `threshold`. Observability only.
    pub fn slow_outliers(&self, threshold: Duration) -> Option<Vec<&FileTiming>> {
        let mut by_elapsed: Vec<&FileTiming> = self.timings.iter().collect();
        by_elapsed.sort_by_key(|timing| std::cmp::Reverse(timing.elapsed));
        match by_elapsed.first() {
            Some(slowest) if slowest.elapsed > threshold => {
                by_elapsed.truncate(SLOW_REPORT_LEN);
                Some(by_elapsed)
            }
            _ => None,
        }
    }
}

/// Convert every queued file, strictly in sorted order.
///
/// Sorting is not needed for correctness; it makes reported timings and the
/// interrupt-recovery state deterministic. Each file runs three sub-steps:
/// the `future_builtins` pre-pass, the main fixer pass, and the doctest
/// fixer pass. Any nonzero fixer status deletes the in-flight mirror copy
/// and aborts the batch. Cancellation observed between sub-steps deletes
/// the in-flight copy *and* every file not yet started, so a later run
/// re-copies and re-converts them fresh.
pub fn convert_all(
    paths: &[PathBuf],
    transformer: &mut dyn Transformer,
    cancel: &CancelToken,
) -> Result<ConvertReport, ConvertError> {
    let mut queue: Vec<PathBuf> = paths.to_vec();
    queue.sort();

    let mut report = ConvertReport::default();
    for (index, path) in queue.iter().enumerate() {
        if cancel.is_cancelled() {
            discard(&queue[index..]);
            return Err(ConvertError::Interrupted { path: path.clone() });
        }

        tracing::info!("converting {}", path.display());
        let started = Instant::now();
        if let Err(err) = convert_one(path, transformer, cancel) {
            // Never leave a half-edited file looking current.
            remove_quietly(path);
            if matches!(err, ConvertError::Interrupted { .. }) {
                discard(&queue[index + 1..]);
            }
            return Err(err);
        }
        report.timings.push(FileTiming {
            path: path.clone(),
            elapsed: started.elapsed(),
        });
        report.converted.push(path.clone());
    }
    Ok(report)
}

fn convert_one(
    path: &Path,
    transformer: &mut dyn Transformer,
    cancel: &CancelToken,
) -> Result<(), ConvertError> {
    prepass::strip_future_builtins(path)?;

    for doctests_only in [false, true] {
        if cancel.is_cancelled() {
            return Err(ConvertError::Interrupted {
                path: path.to_path_buf(),
            });
        }
        let output = transformer.apply(path, doctests_only)?;
        if !output.succeeded() {
            return Err(ConvertError::TransformFailed {
                path: path.to_path_buf(),
                status: output.status,
                diagnostics: output.diagnostics,
            });
        }
    }
    Ok(())
}

/// Remove files queued behind an aborted one; the next run re-copies them.
fn discard(paths: &[PathBuf]) {
    for path in paths {
        if path.is_file() {
            remove_quietly(path);
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!("could not remove {}: {err}", path.display());
    }
}
