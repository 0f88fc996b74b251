//! CLI argument parsing with clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rotating broadcast dispatcher with a liveness endpoint
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Rotating broadcast dispatcher with a liveness endpoint")]
#[command(long_about = "
herald sends every message in messages.txt, with every credential in
tokens.txt, to every destination in destinations.txt, pausing after each
credential's sweep, forever. A liveness endpoint answers on the port from
server_port.txt while it runs.

EXAMPLES:
    # Run with the text sources in the current directory
    herald

    # Read text sources from another directory
    herald --dir /srv/herald

    # Use a settings file for logging and transport options
    herald --config /etc/herald/herald.toml run

    # Validate everything without binding or sending
    herald check
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Settings file path
    ///
    /// TOML file with logger, transport, liveness and clock sections.
    /// Without it, herald.toml in the working directory is used if present.
    #[arg(short, long, value_name = "FILE", env = "HERALD_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the text sources
    ///
    /// Overrides `sources.dir` from the settings file.
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Sets the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Sets the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start broadcasting (default)
    Run,
    /// Load and validate configuration, print a summary and exit
    ///
    /// Exits non-zero when dispatch would not start.
    Check,
}

impl Cli {
    /// Subcommand, defaulting to `run`
    pub fn subcommand(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    /// Level forced by `--verbose` or `--quiet`
    pub fn level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
