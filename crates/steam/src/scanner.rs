//! Game directory scanning.
//!
//! Lists the immediate subdirectories of `steamapps/common` and keeps the
//! ones that carry a `steam_appid.txt` marker with a numeric app id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::LibraryError;
use crate::paths::LibraryPaths;

/// A directory found under `steamapps/common`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: String,
    pub path: PathBuf,
}

/// An installed game identified by its marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Directory name, used as display name and shortcut filename.
    pub name: String,
    /// Steam app id (ASCII digits only).
    pub app_id: String,
}

/// Games found by [`scan_games`] and the number of entries passed over.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub games: Vec<Game>,
    pub skipped: usize,
}

/// Lists the immediate children of `common_dir`, sorted by name.
///
/// Children that cannot be read are logged and left out.
pub fn scan_entries(common_dir: &Path) -> Result<Vec<LibraryEntry>, LibraryError> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(common_dir)? {
        match entry {
            Ok(entry) => entries.push(LibraryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            }),
            Err(e) => {
                tracing::warn!(dir = %common_dir.display(), error = %e, "failed to read library entry");
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Reads the game behind a library entry.
///
/// Returns `Ok(None)` when the entry is not a directory, has no marker file,
/// or the marker does not start with an app id.
pub fn read_game(entry: &LibraryEntry) -> Result<Option<Game>, LibraryError> {
    if !entry.path.is_dir() {
        tracing::debug!(name = %entry.name, "not a directory, skipping");
        return Ok(None);
    }

    let marker = LibraryPaths::marker_path(&entry.path);
    let content = match std::fs::read_to_string(&marker) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(name = %entry.name, "no steam_appid.txt, skipping");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match parse_app_id(&content) {
        Some(app_id) => Ok(Some(Game {
            name: entry.name.clone(),
            app_id,
        })),
        None => {
            tracing::warn!(name = %entry.name, "steam_appid.txt has no app id, skipping");
            Ok(None)
        }
    }
}

/// Extracts the app id from the first line of a marker file.
pub fn parse_app_id(content: &str) -> Option<String> {
    let first = content.lines().next()?;
    let id = first.trim_start_matches('\u{feff}').trim();

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id.to_string())
}

/// Scans `common_dir` for installed games.
///
/// Only a failure to list `common_dir` itself is an error; every per-entry
/// problem is counted as a skip.
pub fn scan_games(common_dir: &Path) -> Result<ScanResult, LibraryError> {
    let mut result = ScanResult::default();

    for entry in scan_entries(common_dir)? {
        match read_game(&entry) {
            Ok(Some(game)) => result.games.push(game),
            Ok(None) => result.skipped += 1,
            Err(e) => {
                tracing::warn!(name = %entry.name, error = %e, "failed to read game entry");
                result.skipped += 1;
            }
        }
    }

    Ok(result)
}
