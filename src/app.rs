use crate::ops::git::GitOps;
use crate::ops::shell::ShellOps;

/// Runs recipes against a pair of collaborators.
pub struct App<G: GitOps, S: ShellOps> {
    pub git: G,
    pub shell: S,
}

impl<G: GitOps, S: ShellOps> App<G, S> {
    pub fn new(git: G, shell: S) -> Self {
        Self { git, shell }
    }
}
