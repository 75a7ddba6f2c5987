//! hicolor icon theme installation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::extract::IconCandidate;

/// Returns the theme icon name for an app id.
pub fn icon_name(app_id: &str) -> String {
    format!("steam_icon_{app_id}")
}

/// Per-candidate results of an install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Images copied into the theme.
    pub copied: usize,
    /// Images already present, left untouched.
    pub existing: usize,
    /// Images with no matching size directory, or whose copy failed.
    pub skipped: usize,
}

impl InstallOutcome {
    /// True if the theme holds at least one image for the app.
    pub fn is_success(&self) -> bool {
        self.copied + self.existing > 0
    }
}

/// An icon theme root such as `~/.local/share/icons/hicolor`.
#[derive(Debug, Clone)]
pub struct IconTheme {
    root: PathBuf,
}

impl IconTheme {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `apps` directory for a size, e.g. `<root>/48x48/apps`.
    pub fn apps_dir(&self, width: u32, height: u32) -> PathBuf {
        self.root.join(format!("{width}x{height}")).join("apps")
    }

    /// Copies candidates into their size directories as `steam_icon_<id>.png`.
    ///
    /// Size directories are never created: a size the theme does not have is
    /// skipped. An existing icon is counted as installed and not overwritten.
    pub async fn install(&self, app_id: &str, candidates: &[IconCandidate]) -> InstallOutcome {
        let file_name = format!("{}.png", icon_name(app_id));
        let mut outcome = InstallOutcome::default();

        for candidate in candidates {
            let dir = self.apps_dir(candidate.width, candidate.height);
            if !tokio::fs::metadata(&dir)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
            {
                tracing::debug!(app_id, dir = %dir.display(), "no theme directory for size, skipping");
                outcome.skipped += 1;
                continue;
            }

            let dest = dir.join(&file_name);
            if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
                tracing::debug!(app_id, path = %dest.display(), "icon already installed");
                outcome.existing += 1;
                continue;
            }

            match tokio::fs::copy(&candidate.path, &dest).await {
                Ok(_) => {
                    tracing::info!(app_id, path = %dest.display(), "icon installed");
                    outcome.copied += 1;
                }
                Err(e) => {
                    tracing::warn!(app_id, path = %dest.display(), error = %e, "failed to copy icon");
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }

    /// Refreshes the GTK icon cache for this theme.
    ///
    /// Best-effort: a missing tool or failure is only logged.
    pub async fn refresh_cache(&self) {
        let result = tokio::process::Command::new("gtk-update-icon-cache")
            .args(["-f", "-t"])
            .arg(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) if status.success() => {
                tracing::debug!(root = %self.root.display(), "icon cache refreshed");
            }
            Ok(status) => tracing::debug!(%status, "gtk-update-icon-cache failed"),
            Err(e) => tracing::debug!(error = %e, "gtk-update-icon-cache not run"),
        }
    }
}
