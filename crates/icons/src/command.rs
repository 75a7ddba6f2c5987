//! External tool invocation.

use std::ffi::OsStr;

use tokio::process::Command;

use crate::IconError;

/// An external tool given as an argv prefix, e.g. `["steamcmd"]` or
/// `["flatpak", "run", "com.valvesoftware.SteamCmd"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Creates a command that runs `program` with no leading arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Builds a command from an argv prefix.
    pub fn from_argv(argv: &[String]) -> Result<Self, IconError> {
        let (program, args) = argv.split_first().ok_or(IconError::EmptyCommand)?;
        if program.is_empty() {
            return Err(IconError::EmptyCommand);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Returns the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns a `tokio` command with the prefix and `extra` arguments applied.
    pub(crate) fn command<I, S>(&self, extra: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(extra);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_argv_splits_program() {
        let argv = vec!["flatpak".to_string(), "run".into(), "com.valvesoftware.SteamCmd".into()];
        let cmd = ToolCommand::from_argv(&argv).unwrap();
        assert_eq!(cmd.program(), "flatpak");
        assert_eq!(cmd.args, vec!["run", "com.valvesoftware.SteamCmd"]);
    }

    #[test]
    fn from_argv_rejects_empty() {
        assert!(matches!(
            ToolCommand::from_argv(&[]),
            Err(IconError::EmptyCommand)
        ));
        assert!(matches!(
            ToolCommand::from_argv(&[String::new()]),
            Err(IconError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn command_runs_prefix_and_extra_args() {
        let cmd = ToolCommand::from_argv(&["sh".to_string(), "-c".into(), "echo $0 $1".into()])
            .unwrap();
        let output = cmd.command(["first", "second"]).output().await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "first second");
    }
}
