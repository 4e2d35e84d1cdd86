//! Steps of a recipe.
//!
//! A run is a list of [`Step`]s: the fixed [`SetupOperation`]s that bring the
//! working tree to a known state, followed by the user's [`Operation`]s in the
//! order the recipe lists them.
//!
//! User operations are read from untyped JSON objects. The `operation` key
//! selects the variant and each variant validates its own keys, reporting the
//! first missing one by name.

use std::fmt::Display;
use std::path::PathBuf;

use log::info;
use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::ops::shell::ShellOps;
use crate::path;
use crate::recipe::Recipe;

pub mod checkout;
pub mod cp;
pub mod diff;
pub mod exec;
pub mod merge;
pub mod pr;
pub mod setup;
pub mod stop;

pub use checkout::Checkout;
pub use cp::Cp;
pub use diff::Diff;
pub use exec::Exec;
pub use merge::Merge;
pub use pr::Pr;
pub use setup::SetupOperation;
pub use stop::Stop;

// -----------------------------------------------------------------------------
// OperationKind

/// The names accepted in an entry's `operation` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Checkout,
    Cp,
    Diff,
    Exec,
    Merge,
    Pr,
    Stop,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        Self::Checkout,
        Self::Cp,
        Self::Diff,
        Self::Exec,
        Self::Merge,
        Self::Pr,
        Self::Stop,
    ];

    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Cp => "cp",
            Self::Diff => "diff",
            Self::Exec => "exec",
            Self::Merge => "merge",
            Self::Pr => "pr",
            Self::Stop => "stop",
        }
    }
}

// -----------------------------------------------------------------------------
// Operation

/// A user-configurable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Checkout(Checkout),
    Cp(Cp),
    Diff(Diff),
    Exec(Exec),
    Merge(Merge),
    Pr(Pr),
    Stop(Stop),
}

impl Operation {
    /// Build an operation from one entry of the recipe's `operations` list.
    pub fn from_entry(recipe: &Recipe, entry: &Map<String, Value>) -> Result<Self> {
        let name = required_str(entry, "operation")?;
        let operation = match OperationKind::parse(&name)? {
            OperationKind::Checkout => Self::Checkout(Checkout::from_entry(recipe, entry)?),
            OperationKind::Cp => Self::Cp(Cp::from_entry(entry)?),
            OperationKind::Diff => Self::Diff(Diff::from_entry(recipe, entry)?),
            OperationKind::Exec => Self::Exec(Exec::from_entry(entry)?),
            OperationKind::Merge => Self::Merge(Merge::from_entry(recipe, entry)?),
            OperationKind::Pr => Self::Pr(Pr::from_entry(recipe, entry)?),
            OperationKind::Stop => Self::Stop(Stop),
        };
        Ok(operation)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Checkout(_) => OperationKind::Checkout,
            Self::Cp(_) => OperationKind::Cp,
            Self::Diff(_) => OperationKind::Diff,
            Self::Exec(_) => OperationKind::Exec,
            Self::Merge(_) => OperationKind::Merge,
            Self::Pr(_) => OperationKind::Pr,
            Self::Stop(_) => OperationKind::Stop,
        }
    }

    pub async fn run(&self, git: &impl GitOps, shell: &impl ShellOps) -> Result<()> {
        match self {
            Self::Checkout(op) => op.run(git).await,
            Self::Cp(op) => {
                let report = op.run()?;
                info!(
                    "Copied {} file(s), {} already up to date",
                    report.copied, report.skipped
                );
                Ok(())
            }
            Self::Diff(op) => op.run(git).await,
            Self::Exec(op) => op.run(shell).await,
            Self::Merge(op) => op.run(git).await,
            Self::Pr(op) => op.run(git).await,
            Self::Stop(op) => op.run(),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkout(op) => op.fmt(f),
            Self::Cp(op) => op.fmt(f),
            Self::Diff(op) => op.fmt(f),
            Self::Exec(op) => op.fmt(f),
            Self::Merge(op) => op.fmt(f),
            Self::Pr(op) => op.fmt(f),
            Self::Stop(op) => op.fmt(f),
        }
    }
}

// -----------------------------------------------------------------------------
// Step

/// One entry of the full run list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Setup(SetupOperation),
    User(Operation),
}

impl Step {
    pub async fn run(&self, git: &impl GitOps, shell: &impl ShellOps) -> Result<()> {
        match self {
            Self::Setup(op) => op.run(git).await,
            Self::User(op) => op.run(git, shell).await,
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(op) => op.fmt(f),
            Self::User(op) => op.fmt(f),
        }
    }
}

// -----------------------------------------------------------------------------
// Entry accessors
//
// A key set to `null` counts as missing.

fn required<'a>(entry: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    match entry.get(key) {
        None | Some(Value::Null) => Err(Error::missing(key)),
        Some(value) => Ok(value),
    }
}

fn optional<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    entry.get(key).filter(|value| !value.is_null())
}

fn as_str(key: &str, value: &Value) -> Result<String> {
    value.as_str().map(str::to_string).ok_or(Error::InvalidKey {
        key: key.to_string(),
        expected: "a string",
    })
}

pub(crate) fn required_str(entry: &Map<String, Value>, key: &str) -> Result<String> {
    as_str(key, required(entry, key)?)
}

pub(crate) fn optional_str(entry: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    optional(entry, key).map(|value| as_str(key, value)).transpose()
}

pub(crate) fn required_path(entry: &Map<String, Value>, key: &str) -> Result<PathBuf> {
    path::resolve(&required_str(entry, key)?)
}

pub(crate) fn optional_path(entry: &Map<String, Value>, key: &str) -> Result<Option<PathBuf>> {
    optional_str(entry, key)?
        .map(|raw| path::resolve(&raw))
        .transpose()
}

pub(crate) fn required_str_list(entry: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    let invalid = || Error::InvalidKey {
        key: key.to_string(),
        expected: "a list of strings",
    };
    required(entry, key)?
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

pub(crate) fn required_id(entry: &Map<String, Value>, key: &str) -> Result<String> {
    match required(entry, key)? {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        _ => Err(Error::InvalidKey {
            key: key.to_string(),
            expected: "a number or string",
        }),
    }
}
