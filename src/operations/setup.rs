use std::fmt::Display;
use std::path::PathBuf;

use crate::error::Result;
use crate::ops::git::GitOps;
use crate::remote;

/// Steps that establish the baseline state of the working tree. They always
/// run, in order, before any user operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOperation {
    /// Clone the repository into a path that does not exist yet.
    Clone { url: String, dst: PathBuf },
    /// Discard changes to tracked files of an existing checkout.
    Reset { dst: PathBuf },
    /// Remove untracked and ignored files.
    Clean { dst: PathBuf },
    /// Fetch the recipe's branch and swap into it.
    Branch {
        url: String,
        branch: String,
        dst: PathBuf,
    },
    Submodules { dst: PathBuf },
}

impl SetupOperation {
    pub async fn run(&self, git: &impl GitOps) -> Result<()> {
        match self {
            Self::Clone { url, dst } => git.clone_repo(url, dst).await,
            Self::Reset { dst } => git.reset_hard(dst).await,
            Self::Clean { dst } => git.clean(dst).await,
            Self::Branch { url, branch, dst } => {
                let remote = remote::fetch(git, dst, url, Some(branch.as_str())).await?;
                git.checkout(dst, &format!("{}/{}", remote, branch)).await
            }
            Self::Submodules { dst } => {
                git.submodule_sync(dst).await?;
                git.submodule_update(dst).await
            }
        }
    }
}

impl Display for SetupOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clone { url, .. } => write!(f, "Cloning {}", url),
            Self::Reset { .. } => f.write_str("Resetting repository"),
            Self::Clean { .. } => f.write_str("Cleaning repository"),
            Self::Branch { branch, .. } => write!(f, "Swapping to '{}'", branch),
            Self::Submodules { .. } => f.write_str("Synchronizing submodules"),
        }
    }
}
