use std::process::ExitCode;

use clap::Parser;
use herald::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match cli::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli::init_logger_from_settings(&cli, &settings) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(version = %herald::pkg_version(), "herald starting");

    match cli::execute_command(&cli, settings).await {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(e) => {
            let error = anyhow::Error::from(e);
            tracing::error!(error = %format!("{:#}", error), "Startup failed");
            ExitCode::FAILURE
        }
    }
}
