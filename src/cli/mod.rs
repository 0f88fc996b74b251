//! CLI module for herald
//!
//! - Argument parsing with clap
//! - Settings loading with CLI overrides
//! - Command execution

pub mod executor;
pub mod handlers;
pub mod parser;

pub use executor::execute_command;
pub use parser::{Cli, Commands};

use crate::config::{ConfigError, ConfigLoader, Settings};
use anyhow::Context;

use crate::logger::init_logger;

/// Load settings and apply CLI overrides
///
/// # Errors
/// Returns error if the settings file is missing, malformed or invalid
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let loader = match cli.config {
        Some(ref path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new(),
    };

    let mut settings = loader.load()?;
    if let Some(ref dir) = cli.dir {
        settings.sources.dir = dir.clone();
    }

    Ok(settings)
}

/// Initialize the logger from settings, honouring `--verbose`/`--quiet`
pub fn init_logger_from_settings(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let mut config = settings.logger.clone().into_logger_config()?;
    if let Some(level) = cli.level_override() {
        config = config.with_level(level);
    }

    init_logger(config).context("Logger initialization error")
}
