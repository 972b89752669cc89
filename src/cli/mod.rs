//! Interactive shell and script runner over [`crate::core::AppContext`].

pub mod commands;
pub mod core;
mod help;
pub mod io;
pub mod output;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
