use std::fmt::Display;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use super::required_str;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::recipe::Recipe;
use crate::remote;

/// Fetch changes from another branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
    pub workdir: PathBuf,
    pub repo: String,
    pub branch: String,
}

impl Merge {
    pub fn from_entry(recipe: &Recipe, entry: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            workdir: recipe.path.clone(),
            repo: required_str(entry, "repo")?,
            branch: required_str(entry, "branch")?,
        })
    }

    pub async fn run(&self, git: &impl GitOps) -> Result<()> {
        let remote =
            remote::fetch(git, &self.workdir, &self.repo, Some(self.branch.as_str())).await?;
        git.merge(&self.workdir, &format!("{}/{}", remote, self.branch))
            .await
    }
}

impl Display for Merge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Merging '{}'", self.branch)
    }
}
