//! Shared run pipeline: synchronize each subtree, then convert its queue.
//!
//! Strictly sequential: one subtree at a time, one file at a time. The
//! fixer subprocess and its captured diagnostics are per-file state, so
//! concurrent subtrees would need isolation this tool does not carry.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use upshift_core::types::TreeName;
use upshift_sync::{synchronize, SyncOptions, SyncReport};

use crate::cancel::CancelToken;
use crate::error::{io_err, ConvertError};
use crate::runner::{convert_all, ConvertReport};
use crate::transformer::Transformer;

/// Knobs shared by every subtree in a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Source-root-relative path mirrored verbatim and never converted.
    pub copy_only: Option<PathBuf>,
}

/// Per-subtree outcome.
#[derive(Debug, Serialize)]
pub struct TreeReport {
    pub tree: TreeName,
    pub sync: SyncReport,
    pub convert: ConvertReport,
}

/// Whole-run outcome.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub trees: Vec<TreeReport>,
}

/// Mirror and convert each named subtree.
///
/// `build_root` already includes the platform tag; subtree `t` mirrors to
/// `<build_root>/<t>`. The build root (and any missing parents) is created
/// up front.
pub fn run(
    source_root: &Path,
    build_root: &Path,
    subtrees: &[TreeName],
    transformer: &mut dyn Transformer,
    cancel: &CancelToken,
    options: &RunOptions,
) -> Result<RunSummary, ConvertError> {
    let started_at = Utc::now();
    std::fs::create_dir_all(build_root).map_err(|e| io_err(build_root, e))?;

    let mut trees = Vec::new();
    for tree in subtrees {
        tracing::info!("processing {tree}");
        let source = source_root.join(&tree.0);
        let mirror = build_root.join(&tree.0);
        let sync_options = SyncOptions {
            copy_only: copy_only_for(tree, options),
        };

        let sync = synchronize(&source, &mirror, &sync_options)?;
        if !sync.queue.is_empty() {
            tracing::info!("have {} file(s) to convert under {tree}", sync.queue.len());
        }
        let convert = convert_all(&sync.queue, transformer, cancel)?;
        trees.push(TreeReport {
            tree: tree.clone(),
            sync,
            convert,
        });
    }
    Ok(RunSummary { started_at, trees })
}

/// Re-base the run-level copy-only path onto a single subtree.
fn copy_only_for(tree: &TreeName, options: &RunOptions) -> Option<PathBuf> {
    options
        .copy_only
        .as_deref()
        .and_then(|dir| dir.strip_prefix(&tree.0).ok())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_only_applies_to_its_own_subtree_only() {
        let options = RunOptions {
            copy_only: Some(PathBuf::from("lib/_compat")),
        };
        assert_eq!(
            copy_only_for(&TreeName::from("lib"), &options),
            Some(PathBuf::from("_compat"))
        );
        assert_eq!(copy_only_for(&TreeName::from("tests"), &options), None);
    }

    #[test]
    fn no_copy_only_configured_means_none_everywhere() {
        let options = RunOptions::default();
        assert_eq!(copy_only_for(&TreeName::from("lib"), &options), None);
    }
}
