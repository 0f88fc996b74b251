//! Command executor for dispatching CLI commands

use std::sync::Arc;

use super::handlers::CheckCommandHandler;
use super::parser::{Cli, Commands};
use crate::app::{App, Exit};
use crate::config::{Configuration, Settings};
use crate::error::AppResult;
use crate::events::{EventSink, TracingSink};

/// Load the text sources and run the selected command
///
/// # Errors
/// Missing required sources, invalid settings, or a liveness bind failure
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<Exit> {
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let configuration = Configuration::load(&settings.sources, sink.as_ref())?;

    match cli.subcommand() {
        Commands::Check => CheckCommandHandler::new(&settings, &configuration).execute(),
        Commands::Run => App::new(settings, configuration, sink).run().await,
    }
}
