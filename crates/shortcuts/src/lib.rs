//! Launcher shortcuts for installed Steam games.
//!
//! Each game gets a freedesktop `.desktop` entry that starts it through the
//! `steam://rungameid/<id>` URI and points at the icon installed by
//! `steamdesk-icons`, or at the generic `steam` icon when none could be
//! installed.

pub mod desktop_entry;
pub mod writer;

// Re-export primary types for convenience.
pub use desktop_entry::{DesktopEntry, DesktopEntryBuilder};
pub use writer::{FALLBACK_ICON, ShortcutOutcome, ShortcutWriter};

/// Errors from shortcut operations.
#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid shortcut name: {0:?}")]
    InvalidName(String),
}
