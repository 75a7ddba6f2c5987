//! Batch driver: scan the library, then create every shortcut.

use std::path::Path;
use std::sync::Arc;

use steamdesk_icons::{Extractor, HashResolver, IconClient, IconPipeline, IconTheme, ToolCommand};
use steamdesk_shortcuts::ShortcutWriter;
use steamdesk_steam::{LibraryPaths, scan_games};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Config;

/// Summary of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Games found with a valid marker file.
    pub scanned: usize,
    /// Library entries without a usable marker file.
    pub skipped: usize,
    /// Shortcuts written.
    pub written: usize,
    /// Games whose shortcut could not be written.
    pub failed: usize,
    /// Shortcuts referencing an installed game icon.
    pub icons_installed: usize,
}

/// Builds the icon pipeline from configuration.
fn build_pipeline(config: &Config) -> anyhow::Result<IconPipeline> {
    let resolver = HashResolver::new(ToolCommand::from_argv(&config.lookup_command)?)
        .with_timeout(config.lookup_timeout());
    let client = IconClient::new(config.http_timeout())?.with_base_url(&config.cdn_base_url);
    let extractor = Extractor::new(ToolCommand::from_argv(&config.extract_command)?);
    let theme = IconTheme::new(config.icon_theme_path()?);

    Ok(IconPipeline::new(resolver, client, extractor, theme))
}

/// Creates a shortcut for every game in the library at `library_root`.
///
/// Fails only when the library layout is missing or unreadable; per-game
/// failures are logged and counted in the report. All games are finished
/// before this returns.
pub async fn run(config: &Config, library_root: &Path) -> anyhow::Result<BatchReport> {
    let paths = LibraryPaths::with_root(library_root);
    paths.validate()?;

    let scan = scan_games(&paths.common_dir())?;
    tracing::info!(
        root = %paths.root().display(),
        games = scan.games.len(),
        skipped = scan.skipped,
        "library scanned"
    );

    let mut report = BatchReport {
        scanned: scan.games.len(),
        skipped: scan.skipped,
        ..Default::default()
    };

    let icons = Arc::new(build_pipeline(config)?);
    let writer = Arc::new(
        ShortcutWriter::new(config.launcher_path()?).with_steam_command(&config.steam_command),
    );

    // Downloads and extracted images, one subdirectory per game.
    let scratch = tempfile::Builder::new()
        .prefix("steamdesk-")
        .tempdir_in(config.temp_path()?)?;

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));
    let mut tasks = JoinSet::new();

    for (index, game) in scan.games.into_iter().enumerate() {
        let entry_scratch = scratch.path().join(format!("{index}-{}", game.app_id));
        let semaphore = Arc::clone(&semaphore);
        let icons = Arc::clone(&icons);
        let writer = Arc::clone(&writer);

        tasks.spawn(async move {
            // The semaphore is never closed.
            let _permit = semaphore.acquire_owned().await.ok();
            let result = writer.create(&game, &icons, &entry_scratch).await;
            (game, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(outcome))) => {
                report.written += 1;
                if outcome.icon_installed {
                    report.icons_installed += 1;
                }
            }
            Ok((game, Err(e))) => {
                tracing::warn!(app_id = %game.app_id, name = %game.name, error = %e, "failed to write shortcut");
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!("shortcut task failed: {e}");
                report.failed += 1;
            }
        }
    }

    if config.refresh_icon_cache && report.icons_installed > 0 {
        icons.theme().refresh_cache().await;
    }

    if let Err(e) = scratch.close() {
        tracing::warn!(error = %e, "failed to remove scratch directory");
    }

    Ok(report)
}
