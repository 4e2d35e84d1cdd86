#![allow(async_fn_in_trait)]

use std::ffi::OsStr;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

use crate::error::Error;
use crate::error::Result;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with Git.
///
/// Every method takes the working tree it acts on; nothing relies on the
/// process working directory.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Clone `url` into `dst`, creating parent directories as needed.
    async fn clone_repo(&self, url: &str, dst: &Path) -> Result<()>;
    /// Discard changes to tracked files.
    async fn reset_hard(&self, repo: &Path) -> Result<()>;
    /// Remove untracked files and directories, including ignored ones.
    async fn clean(&self, repo: &Path) -> Result<()>;
    async fn checkout(&self, repo: &Path, rev: &str) -> Result<()>;
    /// Check out only `files` from `rev`, leaving HEAD and other paths alone.
    async fn checkout_paths(&self, repo: &Path, rev: &str, files: &[String]) -> Result<()>;
    async fn fetch(&self, repo: &Path, remote: &str, refspec: Option<String>) -> Result<()>;
    async fn remote_add(&self, repo: &Path, name: &str, url: &str) -> Result<()>;
    async fn remotes(&self, repo: &Path) -> Result<Vec<String>>;
    async fn merge(&self, repo: &Path, rev: &str) -> Result<()>;
    /// Apply a patch, writing `.rej` files for hunks that fail and fixing
    /// whitespace errors.
    async fn apply(&self, repo: &Path, patch: &Path) -> Result<()>;
    async fn submodule_sync(&self, repo: &Path) -> Result<()>;
    async fn submodule_update(&self, repo: &Path) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit;

impl RealGit {
    /// Run git in `dir` and return its stdout.
    async fn run<I, S>(&self, dir: &Path, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();

        let output = Command::new("git")
            .current_dir(dir)
            .args(&args)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: "git".to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Git {
                args: args
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitOps for RealGit {
    #[instrument(skip(self))]
    async fn clone_repo(&self, url: &str, dst: &Path) -> Result<()> {
        let parent = match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;

        self.run(parent, [OsStr::new("clone"), OsStr::new(url), dst.as_os_str()])
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_hard(&self, repo: &Path) -> Result<()> {
        self.run(repo, ["reset", "--hard"]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clean(&self, repo: &Path) -> Result<()> {
        self.run(repo, ["clean", "-dxf"]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn checkout(&self, repo: &Path, rev: &str) -> Result<()> {
        self.run(repo, ["checkout", rev]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn checkout_paths(&self, repo: &Path, rev: &str, files: &[String]) -> Result<()> {
        let mut args = vec!["checkout", rev, "--"];
        args.extend(files.iter().map(String::as_str));
        self.run(repo, args).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch(&self, repo: &Path, remote: &str, refspec: Option<String>) -> Result<()> {
        let mut args = vec!["fetch", remote];
        if let Some(refspec) = refspec.as_deref() {
            args.push(refspec);
        }
        self.run(repo, args).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remote_add(&self, repo: &Path, name: &str, url: &str) -> Result<()> {
        self.run(repo, ["remote", "add", name, url]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remotes(&self, repo: &Path) -> Result<Vec<String>> {
        let output = self.run(repo, ["remote"]).await?;
        Ok(output.lines().map(|line| line.trim().to_string()).collect())
    }

    #[instrument(skip(self))]
    async fn merge(&self, repo: &Path, rev: &str) -> Result<()> {
        self.run(repo, ["merge", "--no-edit", rev]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn apply(&self, repo: &Path, patch: &Path) -> Result<()> {
        self.run(
            repo,
            [
                OsStr::new("apply"),
                OsStr::new("--reject"),
                OsStr::new("--whitespace=fix"),
                patch.as_os_str(),
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn submodule_sync(&self, repo: &Path) -> Result<()> {
        self.run(repo, ["submodule", "sync", "--recursive"]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn submodule_update(&self, repo: &Path) -> Result<()> {
        self.run(repo, ["submodule", "update", "--init", "--recursive"])
            .await?;
        Ok(())
    }
}
