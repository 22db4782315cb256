//! services/tracker/src/cli/mod.rs
//!
//! The command-line view layer: argument parsing, command handlers, text
//! rendering and the application state they share.

pub mod args;
pub mod commands;
pub mod render;
pub mod state;

pub use args::{Cli, Command};
pub use commands::{run, Output};
pub use state::AppState;
