//! Check command handler
//!
//! Validates settings and text sources without binding or sending.

use crate::app::{App, Exit};
use crate::config::{Configuration, Settings};
use crate::error::AppResult;
use crate::transport::HttpTransport;

/// Handler for the check command
pub struct CheckCommandHandler<'a> {
    settings: &'a Settings,
    configuration: &'a Configuration,
}

impl<'a> CheckCommandHandler<'a> {
    pub fn new(settings: &'a Settings, configuration: &'a Configuration) -> Self {
        Self {
            settings,
            configuration,
        }
    }

    /// Validate and print a summary
    ///
    /// Returns [`Exit::NoMessages`] when the dispatcher would refuse to run.
    pub fn execute(&self) -> AppResult<Exit> {
        self.settings.clock.build()?;
        HttpTransport::new(&self.settings.transport)?;

        for line in self.summary()? {
            println!("{line}");
        }

        if self.configuration.messages.is_empty() {
            println!("✗ No messages found; dispatch would not start");
            return Ok(Exit::NoMessages);
        }

        println!("Check completed successfully - configuration is ready");
        Ok(Exit::Clean)
    }

    /// Summary lines; credentials only appear as hints
    pub fn summary(&self) -> AppResult<Vec<String>> {
        let config = self.configuration;
        let hints: Vec<String> = config.credentials.iter().map(|c| c.hint()).collect();
        let address = App::liveness_address_for(self.settings, config)?;

        Ok(vec![
            format!("✓ Sources directory: {}", self.settings.sources.dir.display()),
            format!("✓ Messages: {}", config.messages.len()),
            format!("✓ Credentials: {} ({})", config.credentials.len(), hints.join(", ")),
            format!("✓ Destinations: {}", config.destinations.len()),
            format!("✓ Sends per cycle: {}", config.sends_per_cycle()),
            format!("✓ Pacing delay: {}s", config.delay.as_secs()),
            format!("✓ Liveness endpoint: {address} -> {:?}", config.health_response),
            format!("✓ Endpoint: {}", self.settings.transport.endpoint),
        ])
    }
}
