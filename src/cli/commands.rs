//! CLI commands and argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Singer tap for the Census API
#[derive(Parser, Debug)]
#[command(name = "tap-getcensus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON), or `ENV` to read TAP_GETCENSUS_* variables.
    /// Repeatable; later sources override earlier ones.
    #[arg(long = "config", value_name = "FILE|ENV")]
    pub config: Vec<String>,

    /// State file (JSON) from a previous run
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Catalog file (JSON) selecting streams to sync
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print the catalog and exit
    #[arg(long, conflicts_with_all = ["test", "about"])]
    pub discover: bool,

    /// Test the connection and exit
    #[arg(long, conflicts_with = "about")]
    pub test: bool,

    /// Print tap metadata and exit
    #[arg(long)]
    pub about: bool,

    /// Output format for --about
    #[arg(long, default_value = "json")]
    pub format: AboutFormat,

    /// Verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for `--about`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AboutFormat {
    /// JSON document
    Json,
    /// Markdown summary
    Markdown,
}

/// What a parsed command line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    About(AboutFormat),
    Discover,
    Test,
    Sync,
}

impl Cli {
    /// Resolve the mode flags into a single command
    pub fn command(&self) -> Command {
        if self.about {
            Command::About(self.format)
        } else if self.discover {
            Command::Discover
        } else if self.test {
            Command::Test
        } else {
            Command::Sync
        }
    }
}
