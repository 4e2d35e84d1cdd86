use std::fmt::Display;
use std::path::PathBuf;

use log::debug;
use serde_json::Map;
use serde_json::Value;

use super::optional_path;
use super::optional_str;
use super::required_str;
use crate::error::Error;
use crate::error::Result;
use crate::ops::shell::ShellOps;

/// Run a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exec {
    pub cmd: String,
    pub path: PathBuf,
    /// Shown instead of the command itself when set.
    pub display: String,
}

impl Exec {
    /// `path` defaults to the working directory the recipe was loaded from.
    pub fn from_entry(entry: &Map<String, Value>) -> Result<Self> {
        let cmd = required_str(entry, "cmd")?;
        let path = match optional_path(entry, "path")? {
            Some(path) => path,
            None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
        };
        let display = optional_str(entry, "display")?.unwrap_or_else(|| cmd.clone());
        Ok(Self { cmd, path, display })
    }

    pub async fn run(&self, shell: &impl ShellOps) -> Result<()> {
        let output = shell.run(&self.cmd, &self.path).await?;

        if !output.success {
            return Err(Error::Command {
                display: self.display.clone(),
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        if !output.stdout.is_empty() {
            debug!("{}", output.stdout.trim_end());
        }
        if !output.stderr.is_empty() {
            debug!("{}", output.stderr.trim_end());
        }
        Ok(())
    }
}

impl Display for Exec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;
    use crate::ops::shell::CommandOutput;
    use crate::ops::shell::MockShellOps;

    fn exec(value: Value) -> Exec {
        Exec::from_entry(value.as_object().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let op = exec(json!({"operation": "exec", "cmd": "qmk compile"}));
        assert_eq!(op.display, "qmk compile");
        assert_eq!(op.path, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_display_override() {
        let op = exec(json!({
            "operation": "exec",
            "cmd": "make elpekenin/access:elpekenin -j8",
            "display": "Compiling",
        }));
        assert_eq!(op.to_string(), "Compiling");
    }

    #[test]
    fn test_cmd_is_required() {
        let entry = json!({"operation": "exec", "display": "Compiling"});
        let err = Exec::from_entry(entry.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required key 'cmd'");
    }

    #[tokio::test]
    async fn test_failure_surfaces_output() {
        let op = exec(json!({"operation": "exec", "cmd": "make", "path": "/fw"}));

        let mut shell = MockShellOps::new();
        shell
            .expect_run()
            .withf(|cmd, cwd| cmd == "make" && cwd == Path::new("/fw"))
            .times(1)
            .returning(|_, _| {
                Ok(CommandOutput {
                    success: false,
                    status: "exit status: 2".to_string(),
                    stdout: "Compiling keymap.c\n".to_string(),
                    stderr: "keymap.c:3: error: expected ';'\n".to_string(),
                })
            });

        let err = op.run(&shell).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Command 'make' failed (exit status: 2)"));
        assert!(message.contains("Compiling keymap.c"));
        assert!(message.contains("expected ';'"));
    }

    #[tokio::test]
    async fn test_success() {
        let op = exec(json!({"operation": "exec", "cmd": "echo hi", "path": "/fw"}));

        let mut shell = MockShellOps::new();
        shell.expect_run().returning(|_, _| {
            Ok(CommandOutput {
                success: true,
                status: "exit status: 0".to_string(),
                stdout: "hi\n".to_string(),
                stderr: String::new(),
            })
        });

        op.run(&shell).await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_success() {
        let op = exec(json!({"operation": "exec", "cmd": "true", "path": "/fw"}));

        let mut shell = MockShellOps::new();
        shell.expect_run().times(1).returning(|_, _| {
            Ok(CommandOutput {
                success: true,
                status: "exit status: 0".to_string(),
                stdout: String::new(),
                stderr: String::new(),
            })
        });

        op.run(&shell).await.unwrap();
    }
}
