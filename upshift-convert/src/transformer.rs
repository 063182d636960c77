//! The external fixer behind a narrow, fakeable seam.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, ConvertError};

/// Result of one fixer invocation.
#[derive(Debug, Clone)]
pub struct PassOutput {
    /// Process exit status; zero means the pass succeeded.
    pub status: i32,
    /// Captured stderr, surfaced only when a file's conversion fails.
    pub diagnostics: String,
}

impl PassOutput {
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}

/// A text-transformation pass applied per file.
///
/// `doctests_only` selects the second sub-step of each conversion: the same
/// fixers applied to doctest blocks embedded in the file instead of its
/// main body. Tests drive the runner with scripted implementations.
pub trait Transformer {
    fn apply(&mut self, path: &Path, doctests_only: bool) -> Result<PassOutput, ConvertError>;
}

/// Fixers enabled for this codebase. The rest of the stock set stays off:
/// some rewrite constructs these sources never use, and a few (`idioms`,
/// `ws_comma`) produce churn that breaks the project's formatting
/// conventions.
pub const DEFAULT_FIXERS: &[&str] = &[
    "basestring",
    "dict",
    "future",
    "has_key",
    "imports",
    "isinstance",
    "itertools",
    "itertools_imports",
    "nonzero",
    "raw_input",
    "unicode",
    "urllib",
    "xrange",
];

/// Production transformer: spawns the external `2to3` tool per file with a
/// fixed fixer allow-list, rewriting in place without backups.
#[derive(Debug, Clone)]
pub struct FixerCommand {
    program: PathBuf,
    fixers: Vec<String>,
}

impl FixerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            fixers: DEFAULT_FIXERS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Replace the fixer allow-list.
    pub fn with_fixers(mut self, fixers: impl IntoIterator<Item = String>) -> Self {
        self.fixers = fixers.into_iter().collect();
        self
    }

    fn args(&self, path: &Path, doctests_only: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--no-diffs".into()];
        for fixer in &self.fixers {
            args.push(format!("--fix={fixer}").into());
        }
        if doctests_only {
            args.push("-d".into());
        }
        args.push("-n".into());
        args.push("-w".into());
        args.push(path.into());
        args
    }
}

impl Transformer for FixerCommand {
    fn apply(&mut self, path: &Path, doctests_only: bool) -> Result<PassOutput, ConvertError> {
        let output = Command::new(&self.program)
            .args(self.args(path, doctests_only))
            .output()
            .map_err(|e| io_err(&self.program, e))?;
        Ok(PassOutput {
            // A missing code means the tool was killed by a signal.
            status: output.status.code().unwrap_or(-1),
            diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
