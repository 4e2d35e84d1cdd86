//! Error values for every fallible step of a recipe run.
//!
//! Nothing in the pipeline recovers from an error: the first one produced is
//! returned unchanged to the top-level caller, which reports it once.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Schema errors, raised before any side effect

    #[error("Missing required key '{0}'")]
    MissingKey(String),

    #[error("Invalid value for key '{key}': expected {expected}")]
    InvalidKey { key: String, expected: &'static str },

    #[error("Undefined environment variable '{0}'")]
    UndefinedVariable(String),

    #[error("Invalid recipe: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    // -------------------------------------------------------------------------
    // Filesystem

    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The destination was edited since the last sync and would be clobbered.
    #[error("File was changed in destination: {}", .0.display())]
    DestinationChanged(PathBuf),

    #[error("Can't copy directory to a file: {}", .0.display())]
    DirectoryOntoFile(PathBuf),

    #[error(
        "Unsupported source/destination combination: {} -> {}",
        src.display(),
        dst.display()
    )]
    UnsupportedCopy { src: PathBuf, dst: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // External tools

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git command failed: git {args}\n{stderr}")]
    Git { args: String, stderr: String },

    #[error("Command '{display}' failed ({status})\n{stdout}{stderr}")]
    Command {
        display: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    // -------------------------------------------------------------------------
    // Intentional abort

    #[error("Stopping...")]
    Stopped,
}

impl Error {
    /// Shortcut for a required key absent from a recipe or operation entry.
    pub fn missing(key: &str) -> Self {
        Self::MissingKey(key.to_string())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
