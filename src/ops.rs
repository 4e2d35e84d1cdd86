//! Integration layers for the external tools a recipe drives.
//!
//! - [`git`]: version-control primitives (clone, fetch, checkout, merge, apply, submodules)
//! - [`shell`]: running arbitrary commands for `exec` steps
//!
//! Each submodule provides a trait with a real implementation and, under
//! test, a `mockall` mock.

pub mod git;
pub mod shell;
