//! Client icon hash lookup through `steamcmd`.
//!
//! `steamcmd +app_info_print <id>` dumps the app's KeyValues metadata; the
//! `common` section carries `"clienticon" "<sha1>"`, which names the `.ico`
//! file on the Steam community CDN.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::IconError;
use crate::command::ToolCommand;

static CLIENT_ICON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""clienticon"\s+"([0-9a-f]+)""#).expect("clienticon regex must compile")
});

/// Extracts the icon hash from one line of `app_info_print` output.
pub fn parse_icon_hash(line: &str) -> Option<&str> {
    CLIENT_ICON
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolves an app id to its client icon hash.
#[derive(Debug, Clone)]
pub struct HashResolver {
    command: ToolCommand,
    timeout: Option<Duration>,
}

impl HashResolver {
    /// Creates a resolver running the given lookup tool.
    pub fn new(command: ToolCommand) -> Self {
        Self {
            command,
            timeout: None,
        }
    }

    /// Bounds the whole lookup; the tool is killed when the limit elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the icon hash for `app_id`, or `None` when it cannot be found.
    ///
    /// Never fails: spawn errors, nonzero exits and timeouts are logged.
    pub async fn resolve(&self, app_id: &str) -> Option<String> {
        let lookup = self.lookup(app_id);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(app_id, ?limit, "icon hash lookup timed out");
                    return None;
                }
            },
            None => lookup.await,
        };

        match result {
            Ok(Some(hash)) => {
                tracing::debug!(app_id, %hash, "icon hash resolved");
                Some(hash)
            }
            Ok(None) => {
                tracing::warn!(app_id, "no clienticon in app info");
                None
            }
            Err(e) => {
                tracing::warn!(app_id, error = %e, "icon hash lookup failed");
                None
            }
        }
    }

    async fn lookup(&self, app_id: &str) -> Result<Option<String>, IconError> {
        let mut child = self
            .command
            .command([
                "+login",
                "anonymous",
                "+app_info_update",
                "1",
                "+app_info_print",
                app_id,
                "+quit",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| IconError::Spawn {
                program: self.command.program().to_string(),
                source,
            })?;

        if let Some(stdout) = child.stdout.take() {
            let mut segments = BufReader::new(stdout).split(b'\n');
            while let Some(segment) = segments.next_segment().await? {
                let line = String::from_utf8_lossy(&segment);
                if let Some(hash) = parse_icon_hash(&line) {
                    let hash = hash.to_string();
                    // The rest of the output is not needed.
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    return Ok(Some(hash));
                }
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(IconError::ToolFailed {
                program: self.command.program().to_string(),
                status: status.to_string(),
            });
        }
        Ok(None)
    }
}
