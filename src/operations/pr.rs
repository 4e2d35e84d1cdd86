use std::fmt::Display;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use super::optional_str;
use super::required_id;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::recipe::Recipe;
use crate::recipe::UPSTREAM_URL;
use crate::remote;

/// Fetch changes from a pull request and merge them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pr {
    pub workdir: PathBuf,
    pub repo: String,
    pub id: String,
}

impl Pr {
    pub fn from_entry(recipe: &Recipe, entry: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            workdir: recipe.path.clone(),
            repo: optional_str(entry, "repo")?.unwrap_or_else(|| UPSTREAM_URL.to_string()),
            id: required_id(entry, "id")?,
        })
    }

    /// Local branch the PR head is fetched into.
    pub fn local_branch(&self) -> String {
        format!("PR{}", self.id)
    }

    pub async fn run(&self, git: &impl GitOps) -> Result<()> {
        let local_branch = self.local_branch();
        let refspec = format!("pull/{}/head:{}", self.id, local_branch);
        remote::fetch(git, &self.workdir, &self.repo, Some(refspec.as_str())).await?;
        git.merge(&self.workdir, &local_branch).await
    }
}

impl Display for Pr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PR {}", self.id)
    }
}
