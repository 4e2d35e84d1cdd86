use std::fmt::Display;

use crate::error::Error;
use crate::error::Result;

/// Stop execution. Handy for truncating a recipe while debugging it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop;

impl Stop {
    pub fn run(&self) -> Result<()> {
        Err(Error::Stopped)
    }
}

impl Display for Stop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("stop")
    }
}
