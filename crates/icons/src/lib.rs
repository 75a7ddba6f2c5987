//! Steam client icon pipeline.
//!
//! 1. **Resolve** - ask `steamcmd` for the app's `clienticon` hash
//! 2. **Fetch** - download `{cdn}/{app_id}/{hash}.ico`
//! 3. **Extract** - unpack the `.ico` with `icotool` into per-size PNGs
//! 4. **Install** - copy the best square images into the hicolor theme

pub mod client;
pub mod command;
pub mod extract;
pub mod pipeline;
pub mod resolver;
pub mod theme;

// Re-export primary types for convenience.
pub use client::{DEFAULT_CDN_BASE_URL, IconClient};
pub use command::ToolCommand;
pub use extract::{Extractor, IconCandidate, parse_candidate, select_eligible};
pub use pipeline::IconPipeline;
pub use resolver::{HashResolver, parse_icon_hash};
pub use theme::{IconTheme, InstallOutcome, icon_name};

/// Errors from the icon pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CDN error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ToolFailed { program: String, status: String },

    #[error("empty command line")]
    EmptyCommand,
}
