//! Settings validation
//!
//! Rules applied to the settings file before anything is bound or sent.

use std::net::IpAddr;

use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};

use crate::config::error::ConfigError;
use crate::config::settings::{
    ClockConfig, LivenessConfig, LoggerSettings, Settings, TransportConfig,
};

/// Placeholder substituted with the destination identifier
pub const DESTINATION_PLACEHOLDER: &str = "{destination}";

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl Settings {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.transport.validate()?;
        self.liveness.validate()?;
        self.clock.validate()?;
        Ok(())
    }
}

impl LoggerSettings {
    /// # Validation Rules
    /// - Level must be one of trace, debug, info, warn, error
    /// - File format must be one of full, compact, json
    /// - File path must not be empty when file output is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level".to_string(),
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format".to_string(),
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file output is enabled.",
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl TransportConfig {
    /// # Validation Rules
    /// - Endpoint must contain `{destination}` and be an http(s) URL
    /// - Timeouts must be greater than 0 when set
    /// - Extra headers must be valid HTTP header names and values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.contains(DESTINATION_PLACEHOLDER) {
            return Err(ConfigError::validation(
                "transport.endpoint".to_string(),
                format!("Endpoint must contain the {DESTINATION_PLACEHOLDER} placeholder"),
            ));
        }

        let sample = self.endpoint.replace(DESTINATION_PLACEHOLDER, "sample");
        let url = Url::parse(&sample).map_err(|e| {
            ConfigError::validation(
                "transport.endpoint".to_string(),
                format!("Invalid endpoint URL '{}': {}", self.endpoint, e),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "transport.endpoint",
                "Only http and https endpoints are supported.",
            ));
        }

        if self.request_timeout == Some(0) {
            return Err(ConfigError::validation(
                "transport.request_timeout",
                "Request timeout must be greater than 0 seconds when set.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "transport.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        for (name, value) in &self.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::validation(
                    "transport.headers".to_string(),
                    format!("Invalid header name '{name}'"),
                ));
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(ConfigError::validation(
                    "transport.headers".to_string(),
                    format!("Invalid value for header '{name}'"),
                ));
            }
        }

        Ok(())
    }
}

impl LivenessConfig {
    /// Host must be an IP address
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host.parse::<IpAddr>().map(|_| ()).map_err(|_| {
            ConfigError::validation(
                "liveness.host".to_string(),
                format!("Host must be an IP address, got '{}'", self.host),
            )
        })
    }
}

impl ClockConfig {
    /// Zone must exist in the tz database
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }
}
