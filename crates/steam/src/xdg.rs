//! Per-user base directories.

use std::path::PathBuf;

use crate::LibraryError;

/// Returns the user's home directory from `$HOME`.
pub fn home_dir() -> Result<PathBuf, LibraryError> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(LibraryError::HomeNotFound)
}

/// Returns the user configuration root: `~/.config`.
pub fn config_home() -> Result<PathBuf, LibraryError> {
    Ok(home_dir()?.join(".config"))
}
