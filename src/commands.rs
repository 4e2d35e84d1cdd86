//! Entry points driven by the CLI.
//!
//! Both consume the step list from [`crate::Recipe::get_all_operations`]:
//! [`display`] only describes it, [`build`] executes it.

pub mod build;
pub mod display;
