pub mod error;
pub mod operations;
pub mod ops;
pub mod path;
pub mod recipe;
pub mod remote;

mod app;
pub mod commands;

// Re-export App and Recipe from modules
pub use app::App;
pub use recipe::Recipe;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
