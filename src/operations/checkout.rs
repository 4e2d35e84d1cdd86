use std::fmt::Display;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use super::required_str;
use super::required_str_list;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::recipe::Recipe;
use crate::remote;

/// Grab some files from another branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub workdir: PathBuf,
    pub repo: String,
    pub branch: String,
    pub files: Vec<String>,
}

impl Checkout {
    pub fn from_entry(recipe: &Recipe, entry: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            workdir: recipe.path.clone(),
            repo: required_str(entry, "repo")?,
            branch: required_str(entry, "branch")?,
            files: required_str_list(entry, "files")?,
        })
    }

    pub async fn run(&self, git: &impl GitOps) -> Result<()> {
        let remote =
            remote::fetch(git, &self.workdir, &self.repo, Some(self.branch.as_str())).await?;
        git.checkout_paths(
            &self.workdir,
            &format!("{}/{}", remote, self.branch),
            &self.files,
        )
        .await
    }
}

impl Display for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Checking out '{}' -- {}",
            self.branch,
            self.files.join(" ")
        )
    }
}
