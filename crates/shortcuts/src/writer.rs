//! Shortcut creation: icon pipeline plus `.desktop` file write.

use std::path::{Path, PathBuf};

use steamdesk_icons::{IconPipeline, icon_name};
use steamdesk_steam::Game;

use crate::ShortcutError;
use crate::desktop_entry::DesktopEntry;

/// Icon referenced when no game icon could be installed.
pub const FALLBACK_ICON: &str = "steam";

/// A shortcut written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutOutcome {
    pub path: PathBuf,
    pub icon: String,
    pub icon_installed: bool,
}

/// Writes launcher entries into a single directory.
#[derive(Debug, Clone)]
pub struct ShortcutWriter {
    launcher_dir: PathBuf,
    steam_command: String,
}

impl ShortcutWriter {
    /// Creates a writer targeting `launcher_dir`, launching through `steam`.
    pub fn new(launcher_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher_dir: launcher_dir.into(),
            steam_command: "steam".to_string(),
        }
    }

    /// Sets the program that opens `steam://` URIs.
    pub fn with_steam_command(mut self, command: impl Into<String>) -> Self {
        self.steam_command = command.into();
        self
    }

    pub fn launcher_dir(&self) -> &Path {
        &self.launcher_dir
    }

    /// Returns the shortcut path for a game: `<launcher_dir>/<name>.desktop`.
    pub fn shortcut_path(&self, game: &Game) -> PathBuf {
        self.launcher_dir.join(format!("{}.desktop", game.name))
    }

    /// Builds the launcher entry for a game.
    pub fn entry_for(&self, game: &Game, icon: &str) -> DesktopEntry {
        DesktopEntry::builder()
            .name(&game.name)
            .comment(format!("Play {} on Steam", game.name))
            .exec(format!(
                "{} steam://rungameid/{}",
                self.steam_command, game.app_id
            ))
            .icon(icon)
            .terminal(false)
            .build()
    }

    /// Writes `entry` as the game's shortcut, replacing an earlier one.
    pub async fn write_entry(
        &self,
        game: &Game,
        entry: &DesktopEntry,
    ) -> Result<PathBuf, ShortcutError> {
        if game.name.is_empty() || game.name.contains('/') || game.name == "." || game.name == ".."
        {
            return Err(ShortcutError::InvalidName(game.name.clone()));
        }

        tokio::fs::create_dir_all(&self.launcher_dir).await?;

        let path = self.shortcut_path(game);
        tokio::fs::write(&path, entry.to_string()).await?;

        // Desktop environments only trust executable launchers.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).await?;
        }

        Ok(path)
    }

    /// Installs the game's icon, then writes its shortcut.
    ///
    /// The icon pipeline never fails the shortcut: without an icon the entry
    /// references [`FALLBACK_ICON`].
    pub async fn create(
        &self,
        game: &Game,
        icons: &IconPipeline,
        scratch: &Path,
    ) -> Result<ShortcutOutcome, ShortcutError> {
        tracing::info!(app_id = %game.app_id, name = %game.name, "creating shortcut");

        let icon_installed = icons.install(&game.app_id, scratch).await.is_success();
        let icon = if icon_installed {
            icon_name(&game.app_id)
        } else {
            tracing::info!(app_id = %game.app_id, "using fallback icon");
            FALLBACK_ICON.to_string()
        };

        let entry = self.entry_for(game, &icon);
        let path = self.write_entry(game, &entry).await?;
        tracing::info!(app_id = %game.app_id, path = %path.display(), "shortcut written");

        Ok(ShortcutOutcome {
            path,
            icon,
            icon_installed,
        })
    }
}
