//! File status queries used by the mask-file generator (C6).
//!
//! The mask-file generator treats its argument as a file only when it names
//! a regular file on disk; otherwise the argument is parsed as a single
//! inline mask. These two predicates are the entire surface needed for that
//! decision.

use std::fs;
use std::path::Path;

/// Returns `true` if `path` refers to a regular file.
///
/// Returns `false` for directories, symlinks, special files, and paths that
/// do not exist. Symlinks are not followed — the link itself is examined.
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}
