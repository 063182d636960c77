//! Domain types for an upshift run.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. Config-facing types are serializable via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a top-level subtree processed by a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeName(pub String);

impl fmt::Display for TreeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TreeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TreeName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// File classification
// ---------------------------------------------------------------------------

/// Extension marking convertible source text.
pub const SOURCE_EXTENSION: &str = ".py";

/// Editor backup / swap suffixes, never mirrored.
const BACKUP_SUFFIXES: &[&str] = &["~", ".bak", ".swp"];

/// Compiled-artifact suffixes, never mirrored.
const COMPILED_SUFFIXES: &[&str] = &[".pyc", "$py.class"];

/// What the synchronizer should do with a source-tree file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Python source text: mirrored and queued for conversion.
    Source,
    /// Anything else worth keeping (C code, data files): mirrored verbatim.
    Data,
    /// Hidden files, backups, and compiled artifacts: never mirrored.
    Ignored,
}

impl EntryKind {
    /// Classify a file by name alone. Directories never reach this; the
    /// walker mirrors them unconditionally.
    pub fn of(file_name: &str) -> Self {
        if file_name.starts_with('.') {
            return Self::Ignored;
        }
        if BACKUP_SUFFIXES
            .iter()
            .chain(COMPILED_SUFFIXES)
            .any(|suffix| file_name.ends_with(suffix))
        {
            return Self::Ignored;
        }
        if file_name.ends_with(SOURCE_EXTENSION) {
            Self::Source
        } else {
            Self::Data
        }
    }
}
