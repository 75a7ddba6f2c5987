//! Configuration management.
//!
//! Configuration is read from `~/.config/steamdesk/config.toml`. The file is
//! optional and every key has a default, so a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use steamdesk_icons::DEFAULT_CDN_BASE_URL;

/// Upper bound for `max_concurrent`.
pub const MAX_CONCURRENT_LIMIT: usize = 256;

/// steamdesk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the `.desktop` files are written to.
    #[serde(default = "default_launcher_dir")]
    pub launcher_dir: String,

    /// Icon theme root; only its existing size directories are used.
    #[serde(default = "default_icon_theme_dir")]
    pub icon_theme_dir: String,

    /// Base URL of the Steam community app images.
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,

    /// Icon hash lookup tool as an argv prefix.
    #[serde(default = "default_lookup_command")]
    pub lookup_command: Vec<String>,

    /// Icon extraction tool as an argv prefix.
    #[serde(default = "default_extract_command")]
    pub extract_command: Vec<String>,

    /// Program that opens `steam://` URIs in the generated entries.
    #[serde(default = "default_steam_command")]
    pub steam_command: String,

    /// Maximum number of games processed at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Hash lookup timeout in seconds (0 = none).
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// HTTP request timeout in seconds (0 = none).
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Run `gtk-update-icon-cache` after icons were installed.
    #[serde(default = "default_true")]
    pub refresh_icon_cache: bool,

    /// Parent of the per-run scratch directory (system temp dir if unset).
    #[serde(default)]
    pub temp_dir: Option<String>,
}

fn default_launcher_dir() -> String {
    "~/.local/share/applications/steam".into()
}

fn default_icon_theme_dir() -> String {
    "~/.local/share/icons/hicolor".into()
}

fn default_cdn_base_url() -> String {
    DEFAULT_CDN_BASE_URL.into()
}

fn default_lookup_command() -> Vec<String> {
    vec!["steamcmd".into()]
}

fn default_extract_command() -> Vec<String> {
    vec!["icotool".into()]
}

fn default_steam_command() -> String {
    "steam".into()
}

fn default_max_concurrent() -> usize {
    4
}

fn default_lookup_timeout() -> u64 {
    120
}

fn default_http_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            launcher_dir: default_launcher_dir(),
            icon_theme_dir: default_icon_theme_dir(),
            cdn_base_url: default_cdn_base_url(),
            lookup_command: default_lookup_command(),
            extract_command: default_extract_command(),
            steam_command: default_steam_command(),
            max_concurrent: default_max_concurrent(),
            lookup_timeout_secs: default_lookup_timeout(),
            http_timeout_secs: default_http_timeout(),
            refresh_icon_cache: default_true(),
            temp_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from disk, or the defaults if there is no file.
    ///
    /// Nothing is written on first run.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Config::default())
        }
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lookup_command.first().is_none_or(|p| p.is_empty()) {
            bail!("lookup_command must name a program");
        }
        if self.extract_command.first().is_none_or(|p| p.is_empty()) {
            bail!("extract_command must name a program");
        }
        if self.steam_command.trim().is_empty() {
            bail!("steam_command must not be empty");
        }
        if !(1..=MAX_CONCURRENT_LIMIT).contains(&self.max_concurrent) {
            bail!("max_concurrent must be between 1 and {MAX_CONCURRENT_LIMIT}");
        }
        Ok(())
    }

    /// Returns the launcher directory with `~` expanded.
    pub fn launcher_path(&self) -> anyhow::Result<PathBuf> {
        expand_home(&self.launcher_dir)
    }

    /// Returns the icon theme root with `~` expanded.
    pub fn icon_theme_path(&self) -> anyhow::Result<PathBuf> {
        expand_home(&self.icon_theme_dir)
    }

    /// Returns the parent directory for the run's scratch space.
    pub fn temp_path(&self) -> anyhow::Result<PathBuf> {
        match &self.temp_dir {
            Some(dir) if !dir.is_empty() => expand_home(dir),
            _ => Ok(std::env::temp_dir()),
        }
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        secs(self.lookup_timeout_secs)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        secs(self.http_timeout_secs)
    }
}

fn secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

/// Expands a `~` prefix to the user's home directory.
fn expand_home(path: &str) -> anyhow::Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        Ok(steamdesk_steam::home_dir()?.join(rest))
    } else if path == "~" {
        Ok(steamdesk_steam::home_dir()?)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Returns the configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    Ok(steamdesk_steam::config_home()?
        .join("steamdesk")
        .join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.launcher_dir, "~/.local/share/applications/steam");
        assert_eq!(config.icon_theme_dir, "~/.local/share/icons/hicolor");
        assert_eq!(config.lookup_command, vec!["steamcmd"]);
        assert_eq!(config.extract_command, vec!["icotool"]);
        assert_eq!(config.steam_command, "steam");
        assert_eq!(config.max_concurrent, 4);
        assert!(config.refresh_icon_cache);
        assert!(config.temp_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_partial_toml() {
        // Only specify the concurrency, rest should use defaults.
        let config: Config = toml::from_str("max_concurrent = 8").unwrap();
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.lookup_command, vec!["steamcmd"]);
        assert_eq!(config.cdn_base_url, DEFAULT_CDN_BASE_URL);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            lookup_command: vec!["flatpak".into(), "run".into(), "com.valvesoftware.SteamCmd".into()],
            http_timeout_secs: 0,
            refresh_icon_cache: false,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.lookup_command.len(), 3);
        assert_eq!(parsed.http_timeout(), None);
        assert!(!parsed.refresh_icon_cache);
    }

    #[test]
    fn timeouts_zero_means_none() {
        let config = Config {
            lookup_timeout_secs: 0,
            http_timeout_secs: 30,
            ..Config::default()
        };
        assert_eq!(config.lookup_timeout(), None);
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let empty_lookup = Config {
            lookup_command: Vec::new(),
            ..Config::default()
        };
        assert!(empty_lookup.validate().is_err());

        let empty_extract = Config {
            extract_command: vec![String::new()],
            ..Config::default()
        };
        assert!(empty_extract.validate().is_err());

        let no_workers = Config {
            max_concurrent: 0,
            ..Config::default()
        };
        assert!(no_workers.validate().is_err());

        let too_many = Config {
            max_concurrent: MAX_CONCURRENT_LIMIT + 1,
            ..Config::default()
        };
        assert!(too_many.validate().is_err());

        let at_limit = Config {
            max_concurrent: MAX_CONCURRENT_LIMIT,
            ..Config::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "launcher_dir = \"/opt/apps\"\nmax_concurrent = 2\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.launcher_path().unwrap(), PathBuf::from("/opt/apps"));
        assert_eq!(config.max_concurrent, 2);
    }

    #[test]
    fn load_from_rejects_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_concurrent = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "max_concurrent = 9223372036854775807\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "max_concurrent = \"many\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn expand_home_paths() {
        assert_eq!(expand_home("/abs/path").unwrap(), PathBuf::from("/abs/path"));
        if let Ok(home) = steamdesk_steam::home_dir() {
            assert_eq!(expand_home("~/x").unwrap(), home.join("x"));
            assert_eq!(expand_home("~").unwrap(), home);
        }
    }

    #[test]
    fn config_path_not_empty() {
        if let Ok(path) = config_path() {
            assert!(path.ends_with("steamdesk/config.toml"));
        }
    }
}
