pub mod paths;
pub mod scanner;
pub mod xdg;

// Re-export primary types.
pub use paths::{LibraryPaths, MARKER_FILE};
pub use scanner::{Game, LibraryEntry, ScanResult, parse_app_id, read_game, scan_entries, scan_games};
pub use xdg::{config_home, home_dir};

/// Errors for Steam library operations.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("library root not found: {0}")]
    RootNotFound(String),

    #[error("no steamapps/common directory under {0}")]
    CommonDirNotFound(String),

    #[error("home directory not found")]
    HomeNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
