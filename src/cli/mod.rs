//! CLI module
//!
//! Singer-style command line: mode flags instead of subcommands.
//!
//! # Modes
//!
//! - `--about` - Print tap metadata (`--format json|markdown`)
//! - `--discover` - Print the catalog
//! - `--test` - Test the connection
//! - default - Sync selected streams to stdout

mod commands;
mod runner;

pub use commands::{AboutFormat, Cli, Command};
pub use runner::Runner;
