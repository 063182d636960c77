//! Pre-conversion patch for `future_builtins` imports.
//!
//! lib2to3 cannot parse `from future_builtins import ...` (CPython issue
//! 19111), and the module is gone in Python 3 anyway, so matching lines are
//! stripped before the fixer ever sees the file.

use std::path::Path;

use crate::error::{io_err, ConvertError};

const REMOVED_IMPORT: &str = "from future_builtins import ";

/// Strip every `future_builtins` import line from `path`.
///
/// The file is only rewritten when at least one line matched, so untouched
/// files keep their copied timestamps. Returns whether a rewrite happened.
pub fn strip_future_builtins(path: &Path) -> Result<bool, ConvertError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if !contents.lines().any(|line| line.starts_with(REMOVED_IMPORT)) {
        return Ok(false);
    }

    tracing::info!("stripping future_builtins import from {}", path.display());
    let kept: String = contents
        .split_inclusive('\n')
        .filter(|line| !line.starts_with(REMOVED_IMPORT))
        .collect();
    std::fs::write(path, kept).map_err(|e| io_err(path, e))?;
    Ok(true)
}
