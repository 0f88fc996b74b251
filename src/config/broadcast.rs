//! The immutable broadcast configuration, read once at startup.

use std::time::Duration;

use crate::config::settings::SourcesConfig;
use crate::config::sources::{parse_or_default, read_first_line, read_list};
use crate::error::{AppError, AppResult};
use crate::events::EventSink;
use crate::models::{Credential, Destination};

pub const DEFAULT_HEALTH_RESPONSE: &str = "OK";
pub const DEFAULT_DELAY_SECONDS: u64 = 5;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Send order; may be empty, the dispatcher checks it on entry
    pub messages: Vec<String>,
    /// Never empty
    pub credentials: Vec<Credential>,
    /// Never empty
    pub destinations: Vec<Destination>,
    pub display_name: String,
    pub health_response: String,
    pub delay: Duration,
    pub port: u16,
}

impl Configuration {
    /// Read every text source.
    ///
    /// Optional values fall back to their defaults (reporting invalid ones to
    /// `sink`). Missing credentials, destinations or display name fail with
    /// [`AppError::MissingSource`].
    pub fn load(sources: &SourcesConfig, sink: &dyn EventSink) -> AppResult<Self> {
        let tokens_path = sources.path(&sources.tokens);
        let destinations_path = sources.path(&sources.destinations);
        let display_name_path = sources.path(&sources.display_name);

        let credentials: Vec<Credential> = read_list(&tokens_path, sink)
            .iter()
            .filter_map(|line| Credential::new(line))
            .collect();
        let destinations: Vec<Destination> = read_list(&destinations_path, sink)
            .iter()
            .filter_map(|line| Destination::new(line))
            .collect();
        let display_name = read_first_line(&display_name_path, sink);
        let messages = read_list(&sources.path(&sources.messages), sink);
        let health_response = read_first_line(&sources.path(&sources.health_response), sink)
            .unwrap_or_else(|| DEFAULT_HEALTH_RESPONSE.to_string());

        let delay_raw = read_first_line(&sources.path(&sources.delay_seconds), sink);
        // u64 parsing already turns negative values into the fallback
        let delay_seconds = parse_or_default(
            "delay_seconds",
            delay_raw.as_deref(),
            DEFAULT_DELAY_SECONDS,
            |_| true,
            sink,
        );

        let port_raw = read_first_line(&sources.path(&sources.server_port), sink);
        let port = parse_or_default(
            "server_port",
            port_raw.as_deref(),
            DEFAULT_PORT,
            |port| *port != 0,
            sink,
        );

        if credentials.is_empty() {
            return Err(AppError::MissingSource {
                item: "credentials",
                path: tokens_path,
            });
        }
        if destinations.is_empty() {
            return Err(AppError::MissingSource {
                item: "destinations",
                path: destinations_path,
            });
        }
        let Some(display_name) = display_name else {
            return Err(AppError::MissingSource {
                item: "display name",
                path: display_name_path,
            });
        };

        Ok(Self {
            messages,
            credentials,
            destinations,
            display_name,
            health_response,
            delay: Duration::from_secs(delay_seconds),
            port,
        })
    }

    /// Sends in one full traversal
    pub fn sends_per_cycle(&self) -> usize {
        self.messages.len() * self.credentials.len() * self.destinations.len()
    }
}
