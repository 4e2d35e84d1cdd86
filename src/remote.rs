//! Ad-hoc remotes for fetching from arbitrary URLs.
//!
//! Recipes reference other repositories by URL. Each URL is registered on the
//! working repository under a name derived from the URL itself, so the same URL
//! always maps to the same remote and re-running a recipe never piles up
//! duplicates.

use std::path::Path;

use log::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;
use crate::ops::git::GitOps;

/// Remote name for `url`: stable across runs and platforms.
pub fn name_for(url: &str) -> String {
    format!("x{:016x}", xxh3_64(url.as_bytes()))
}

/// Register `url` on `repo` unless already present. Returns the remote name.
pub async fn add_remote(git: &impl GitOps, repo: &Path, url: &str) -> Result<String> {
    let name = name_for(url);

    if git.remotes(repo).await?.iter().any(|remote| *remote == name) {
        debug!("Remote {} already registered for {}", name, url);
    } else {
        git.remote_add(repo, &name, url).await?;
    }

    Ok(name)
}

/// Fetch `refspec` (or everything when `None`) from `url` into `repo`.
///
/// Returns the remote name so callers can refer to `<name>/<branch>`.
pub async fn fetch(
    git: &impl GitOps,
    repo: &Path,
    url: &str,
    refspec: Option<&str>,
) -> Result<String> {
    let name = add_remote(git, repo, url).await?;
    git.fetch(repo, &name, refspec.map(str::to_string)).await?;
    Ok(name)
}
