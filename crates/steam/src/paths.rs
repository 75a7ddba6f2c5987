use std::path::{Path, PathBuf};

use crate::LibraryError;

/// Name of the per-game marker file holding the Steam app id.
pub const MARKER_FILE: &str = "steam_appid.txt";

/// Provides access to the directories of a Steam library.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    root: PathBuf,
}

impl LibraryPaths {
    /// Creates a new `LibraryPaths` rooted at the given library directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the steamapps directory.
    pub fn steamapps_dir(&self) -> PathBuf {
        self.root.join("steamapps")
    }

    /// Returns the directory holding one subdirectory per installed game.
    pub fn common_dir(&self) -> PathBuf {
        self.steamapps_dir().join("common")
    }

    /// Returns the marker file path inside a game directory.
    pub fn marker_path(entry_dir: &Path) -> PathBuf {
        entry_dir.join(MARKER_FILE)
    }

    /// Checks that the root and its `steamapps/common` directory exist.
    pub fn validate(&self) -> Result<(), LibraryError> {
        if !self.root.exists() {
            return Err(LibraryError::RootNotFound(
                self.root.display().to_string(),
            ));
        }
        if !self.common_dir().is_dir() {
            return Err(LibraryError::CommonDirNotFound(
                self.root.display().to_string(),
            ));
        }
        Ok(())
    }
}
