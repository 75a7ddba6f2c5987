//! Full icon pipeline for one app: resolve, fetch, extract, install.

use std::path::{Path, PathBuf};

use crate::client::IconClient;
use crate::extract::{Extractor, select_eligible};
use crate::resolver::HashResolver;
use crate::theme::{IconTheme, InstallOutcome};

/// Name of the extraction directory inside an entry's scratch directory.
const EXTRACT_DIR: &str = "extracted";

/// Wires the pipeline stages together.
#[derive(Debug, Clone)]
pub struct IconPipeline {
    resolver: HashResolver,
    client: IconClient,
    extractor: Extractor,
    theme: IconTheme,
}

impl IconPipeline {
    pub fn new(
        resolver: HashResolver,
        client: IconClient,
        extractor: Extractor,
        theme: IconTheme,
    ) -> Self {
        Self {
            resolver,
            client,
            extractor,
            theme,
        }
    }

    /// Returns the target icon theme.
    pub fn theme(&self) -> &IconTheme {
        &self.theme
    }

    /// Downloads the icon archive for `app_id` into `scratch`.
    ///
    /// Returns `None` when the hash cannot be resolved or the download fails.
    pub async fn fetch(&self, app_id: &str, scratch: &Path) -> Option<PathBuf> {
        let hash = self.resolver.resolve(app_id).await?;

        if let Err(e) = tokio::fs::create_dir_all(scratch).await {
            tracing::warn!(app_id, dir = %scratch.display(), error = %e, "failed to create scratch dir");
            return None;
        }

        match self.client.download(app_id, &hash, scratch).await {
            Ok(path) => {
                tracing::info!(app_id, url = %self.client.icon_url(app_id, &hash), "icon downloaded");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(app_id, error = %e, "icon download failed");
                None
            }
        }
    }

    /// Runs every stage and installs the selected images into the theme.
    pub async fn install(&self, app_id: &str, scratch: &Path) -> InstallOutcome {
        let Some(archive) = self.fetch(app_id, scratch).await else {
            return InstallOutcome::default();
        };

        let candidates = self
            .extractor
            .extract(&archive, &scratch.join(EXTRACT_DIR))
            .await;
        let eligible = select_eligible(&candidates);
        tracing::debug!(
            app_id,
            found = candidates.len(),
            eligible = eligible.len(),
            "icon candidates selected"
        );

        self.theme.install(app_id, &eligible).await
    }
}
