//! Run configuration, optionally loaded from `upshift.yaml`.
//!
//! Every field has a serde default, so a missing or partial config file
//! behaves the same as no file at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::TreeName;

/// Config file name, looked up in the source root.
pub const CONFIG_FILE: &str = "upshift.yaml";

/// Tunables for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// The fixed set of subtree names a run may process.
    pub subtrees: Vec<TreeName>,

    /// Output layout component: converted trees live at
    /// `build/<platform_tag>/<subtree>`. Caches built with different fixer
    /// vintages must not mix, so bump the tag when the fixer changes.
    pub platform_tag: String,

    /// Source-root-relative directory mirrored verbatim and never queued
    /// for conversion (compatibility shims that must stay as written).
    pub copy_only: PathBuf,

    /// External fixer program invoked per file.
    pub fixer_program: PathBuf,

    /// Report the slowest conversions when the slowest exceeded this many
    /// seconds.
    pub slow_report_threshold_secs: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            subtrees: ["lib", "tests", "scripts", "doc"]
                .into_iter()
                .map(TreeName::from)
                .collect(),
            platform_tag: "py3".to_owned(),
            copy_only: PathBuf::from("lib/_compat"),
            fixer_program: PathBuf::from("2to3"),
            slow_report_threshold_secs: 2.0,
        }
    }
}

impl RunConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `upshift.yaml` from `dir` if present, defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether `name` is in the known subtree set.
    pub fn knows(&self, name: &str) -> bool {
        self.subtrees.iter().any(|tree| tree.0 == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(config.knows("lib"));
        assert!(!config.knows("Bio"));
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "subtrees: [src, examples]\nplatform_tag: py3.9\n").unwrap();

        let config = RunConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(
            config.subtrees,
            vec![TreeName::from("src"), TreeName::from("examples")]
        );
        assert_eq!(config.platform_tag, "py3.9");
        assert_eq!(config.fixer_program, PathBuf::from("2to3"));
        assert_eq!(config.slow_report_threshold_secs, 2.0);
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "subtrees: {not: [valid").unwrap();

        let err = RunConfig::load(&path).unwrap_err();
        match err {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn roundtrips_through_yaml() {
        let config = RunConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: RunConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }
}
