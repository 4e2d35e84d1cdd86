use colored::Colorize;

use crate::App;
use crate::Recipe;
use crate::error::Error;
use crate::error::Result;
use crate::ops::git::GitOps;
use crate::ops::shell::ShellOps;

impl<G: GitOps, S: ShellOps> App<G, S> {
    /// Describe every step of `recipe` without running anything.
    pub fn cmd_display(&self, recipe: &Recipe, stdout: &mut impl std::io::Write) -> Result<()> {
        let steps = recipe.get_all_operations()?;
        for (index, step) in steps.iter().enumerate() {
            let number = format!("{}.", index + 1);
            writeln!(stdout, "{} {}", number.dimmed(), step).map_err(Error::Output)?;
        }
        Ok(())
    }
}
