use std::fmt::Display;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;

use super::optional_path;
use super::required_path;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::recipe::Recipe;

/// Apply a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub file: PathBuf,
    /// Tree the patch applies to, the recipe's path unless overridden.
    pub path: PathBuf,
}

impl Diff {
    pub fn from_entry(recipe: &Recipe, entry: &Map<String, Value>) -> Result<Self> {
        let file = required_path(entry, "file")?;
        let path = optional_path(entry, "path")?.unwrap_or_else(|| recipe.path.clone());
        Ok(Self { file, path })
    }

    pub async fn run(&self, git: &impl GitOps) -> Result<()> {
        git.apply(&self.path, &self.file).await
    }
}

impl Display for Diff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.file.file_name().unwrap_or(self.file.as_os_str());
        write!(f, "Applying '{}'", name.to_string_lossy())
    }
}
