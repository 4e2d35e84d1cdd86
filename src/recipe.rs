//! Structure of a build recipe file.
//!
//! ```json
//! {
//!     "repo": "https://github.com/qmk/qmk_firmware",
//!     "branch": "master",
//!     "clean": false,
//!     "path": "~/qmk_firmware",
//!     "operations": [
//!         {"operation": "pr", "id": 23463},
//!         {"operation": "exec", "cmd": "qmk compile -kb access -km elpekenin"}
//!     ]
//! }
//! ```

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::operations::Operation;
use crate::operations::SetupOperation;
use crate::operations::Step;
use crate::path;

/// Repository used when a recipe (or a `pr` operation) doesn't name one.
pub const UPSTREAM_URL: &str = "https://github.com/qmk/qmk_firmware";

pub const DEFAULT_BRANCH: &str = "master";

/// Recipe file read when none is given on the command line.
pub const DEFAULT_RECIPE: &str = "build.json";

/// An untyped entry of the `operations` list.
pub type OperationSpec = Map<String, Value>;

/// A firmware build: where to work and what to do there.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub repository_url: String,
    pub branch: String,
    pub clean: bool,
    /// Working tree every step acts on.
    pub path: PathBuf,
    pub operations: Vec<OperationSpec>,
}

/// On-disk shape. Unknown keys are ignored.
#[derive(Deserialize)]
struct RecipeFile {
    repo: Option<String>,
    branch: Option<String>,
    clean: Option<bool>,
    path: Option<String>,
    operations: Option<Vec<OperationSpec>>,
}

impl Recipe {
    pub fn from_file(file: &Path) -> Result<Self> {
        if !file.is_file() {
            return Err(Error::NotAFile(file.to_path_buf()));
        }
        let text = std::fs::read_to_string(file).map_err(|e| Error::io(file, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let data: RecipeFile = serde_json::from_str(text)?;

        let path = data.path.ok_or_else(|| Error::missing("path"))?;
        let operations = data.operations.ok_or_else(|| Error::missing("operations"))?;

        Ok(Self {
            repository_url: data.repo.unwrap_or_else(|| UPSTREAM_URL.to_string()),
            branch: data.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            clean: data.clean.unwrap_or(false),
            path: path::resolve(&path)?,
            operations,
        })
    }

    /// Fixed steps that bring `path` to the recipe's branch.
    pub fn get_setup_operations(&self) -> Result<Vec<SetupOperation>> {
        let dst = self.path.clone();
        let mut steps = vec![];

        if self.path.exists() {
            if !self.path.is_dir() {
                return Err(Error::NotADirectory(dst));
            }
            steps.push(SetupOperation::Reset { dst: dst.clone() });
        } else {
            steps.push(SetupOperation::Clone {
                url: self.repository_url.clone(),
                dst: dst.clone(),
            });
        }

        if self.clean {
            steps.push(SetupOperation::Clean { dst: dst.clone() });
        }

        steps.push(SetupOperation::Branch {
            url: self.repository_url.clone(),
            branch: self.branch.clone(),
            dst: dst.clone(),
        });
        steps.push(SetupOperation::Submodules { dst });

        Ok(steps)
    }

    /// Setup steps followed by the user's operations.
    ///
    /// Every entry is validated here, so a bad one fails the run before any
    /// step executes.
    pub fn get_all_operations(&self) -> Result<Vec<Step>> {
        let mut steps: Vec<Step> = self
            .get_setup_operations()?
            .into_iter()
            .map(Step::Setup)
            .collect();

        for entry in &self.operations {
            steps.push(Step::User(Operation::from_entry(self, entry)?));
        }

        Ok(steps)
    }

    #[cfg(test)]
    pub(crate) fn for_tests(path: &str) -> Self {
        Self {
            repository_url: UPSTREAM_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            clean: false,
            path: PathBuf::from(path),
            operations: vec![],
        }
    }
}
