//! CLI module
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Boot the store and serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
