//! `.ico` extraction and candidate selection.
//!
//! `icotool -x` writes one PNG per embedded image, named
//! `<stem>_<index>_<W>x<H>x<D>.png`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;

use crate::IconError;
use crate::command::ToolCommand;

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)x(\d+)x(\d+)\.png$").expect("candidate filename regex must compile")
});

/// One image unpacked from an icon archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCandidate {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u32,
}

impl IconCandidate {
    /// Returns true if the image is square.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// Parses an extracted filename into a candidate.
pub fn parse_candidate(path: &Path) -> Option<IconCandidate> {
    let name = path.file_name()?.to_str()?;
    let caps = CANDIDATE.captures(name)?;

    Some(IconCandidate {
        path: path.to_path_buf(),
        width: caps[1].parse().ok()?,
        height: caps[2].parse().ok()?,
        bit_depth: caps[3].parse().ok()?,
    })
}

/// Returns the square candidates at the highest bit depth found among all
/// candidates.
///
/// Non-square images still count towards the maximum.
pub fn select_eligible(candidates: &[IconCandidate]) -> Vec<IconCandidate> {
    let Some(max_depth) = candidates.iter().map(|c| c.bit_depth).max() else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|c| c.is_square() && c.bit_depth == max_depth)
        .cloned()
        .collect()
}

/// Unpacks icon archives with an external tool.
#[derive(Debug, Clone)]
pub struct Extractor {
    command: ToolCommand,
}

impl Extractor {
    /// Creates an extractor running the given tool (`icotool` by default).
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Extracts `archive` into `dest` and returns the parsed candidates.
    ///
    /// Failures are logged and produce an empty list.
    pub async fn extract(&self, archive: &Path, dest: &Path) -> Vec<IconCandidate> {
        match self.try_extract(archive, dest).await {
            Ok(candidates) => {
                tracing::debug!(
                    archive = %archive.display(),
                    count = candidates.len(),
                    "icon archive extracted"
                );
                candidates
            }
            Err(e) => {
                tracing::warn!(archive = %archive.display(), error = %e, "icon extraction failed");
                Vec::new()
            }
        }
    }

    async fn try_extract(
        &self,
        archive: &Path,
        dest: &Path,
    ) -> Result<Vec<IconCandidate>, IconError> {
        tokio::fs::create_dir_all(dest).await?;

        let output = self
            .command
            .command([
                OsStr::new("-x"),
                OsStr::new("-o"),
                dest.as_os_str(),
                archive.as_os_str(),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| IconError::Spawn {
                program: self.command.program().to_string(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "extraction tool output"
            );
            return Err(IconError::ToolFailed {
                program: self.command.program().to_string(),
                status: output.status.to_string(),
            });
        }

        let mut candidates = Vec::new();
        let mut entries = tokio::fs::read_dir(dest).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(candidate) = parse_candidate(&entry.path()) {
                candidates.push(candidate);
            }
        }

        candidates.sort_by(|a, b| {
            (a.width, a.height, a.bit_depth, &a.path).cmp(&(b.width, b.height, b.bit_depth, &b.path))
        });
        Ok(candidates)
    }
}
