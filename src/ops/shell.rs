#![allow(async_fn_in_trait)]

use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

use crate::error::Error;
use crate::error::Result;

// -----------------------------------------------------------------------------
// ShellOps trait

/// Running arbitrary shell commands
#[cfg_attr(test, automock)]
pub trait ShellOps {
    /// Run `cmd` through the shell in `cwd` and wait for it to exit.
    async fn run(&self, cmd: &str, cwd: &Path) -> Result<CommandOutput>;
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit status as reported by the OS, e.g. `exit status: 2`.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

// -----------------------------------------------------------------------------
// RealShell

/// Real implementation that spawns `sh -c`
pub struct RealShell;

impl ShellOps for RealShell {
    #[instrument(skip(self))]
    async fn run(&self, cmd: &str, cwd: &Path) -> Result<CommandOutput> {
        let output = Command::new("sh")
            .args(["-c", cmd])
            .current_dir(cwd)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: "sh".to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
