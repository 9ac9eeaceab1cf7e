//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Reaction-quorum voting bot for application review
#[derive(Parser, Debug)]
#[command(name = "votegate")]
#[command(author, version, about)]
#[command(long_about = "Posts pending applications from a spreadsheet into a Discord channel, \
collects approve/deny reactions, and writes the decision back once a quorum is reached.")]
pub struct Cli {
    /// Verbosity level (default info, -v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment only)
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Default log filter for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
