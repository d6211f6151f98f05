//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve relative paths against a base directory
//! - `library_file_name` - platform file name of a dynamic library

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a user-supplied path against `base_dir`.
///
/// Expands a leading `~`, joins relative paths onto `base_dir` and
/// normalizes the result. Always returns an absolute path.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        normalize_path(&path)
    } else {
        normalize_path(&base_dir.join(path))
    }
}

/// Platform file name cargo gives a `cdylib` named `crate_name`.
///
/// `my-guest` → `libmy_guest.so` / `libmy_guest.dylib` / `my_guest.dll`
pub fn library_file_name(crate_name: &str) -> String {
    format!("{DLL_PREFIX}{}{DLL_SUFFIX}", crate_name.replace('-', "_"))
}
