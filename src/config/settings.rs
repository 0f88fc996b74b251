//! Ambient settings for herald
//!
//! Everything here comes from the optional TOML settings file and `HERALD_*`
//! environment variables. The broadcast data itself (credentials,
//! destinations, messages...) lives in plain text files described by
//! [`SourcesConfig`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::{DEFAULT_FORMAT, DEFAULT_TIMEZONE, LocalClock};
use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/herald.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_sources_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tokens_file() -> String {
    "tokens.txt".to_string()
}

fn default_destinations_file() -> String {
    "destinations.txt".to_string()
}

fn default_display_name_file() -> String {
    "display_name.txt".to_string()
}

fn default_messages_file() -> String {
    "messages.txt".to_string()
}

fn default_health_response_file() -> String {
    "health_response.txt".to_string()
}

fn default_delay_file() -> String {
    "delay_seconds.txt".to_string()
}

fn default_port_file() -> String {
    "server_port.txt".to_string()
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8090/conversations/{destination}/messages".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_liveness_host() -> String {
    "0.0.0.0".to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_time_format() -> String {
    DEFAULT_FORMAT.to_string()
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub liveness: LivenessConfig,

    #[serde(default)]
    pub clock: ClockConfig,
}

// ============================================================================
// Text Sources
// ============================================================================

/// Locations of the plain text inputs, relative to `dir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Directory the file names below are resolved against
    #[serde(default = "default_sources_dir")]
    pub dir: PathBuf,

    /// Credentials, one per line
    #[serde(default = "default_tokens_file")]
    pub tokens: String,

    /// Destination identifiers, one per line
    #[serde(default = "default_destinations_file")]
    pub destinations: String,

    /// Display name prefixed onto every message (first line)
    #[serde(default = "default_display_name_file")]
    pub display_name: String,

    /// Messages, one per line, in send order
    #[serde(default = "default_messages_file")]
    pub messages: String,

    /// Liveness response body (first line)
    #[serde(default = "default_health_response_file")]
    pub health_response: String,

    /// Pacing delay in whole seconds (first line)
    #[serde(default = "default_delay_file")]
    pub delay_seconds: String,

    /// Liveness port (first line)
    #[serde(default = "default_port_file")]
    pub server_port: String,
}

impl SourcesConfig {
    /// Sources rooted at `dir` with the default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Resolve a file name against `dir`
    pub fn path(&self, file: &str) -> PathBuf {
        let file = Path::new(file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.dir.join(file)
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            dir: default_sources_dir(),
            tokens: default_tokens_file(),
            destinations: default_destinations_file(),
            display_name: default_display_name_file(),
            messages: default_messages_file(),
            health_response: default_health_response_file(),
            delay_seconds: default_delay_file(),
            server_port: default_port_file(),
        }
    }
}

// ============================================================================
// Outbound Transport
// ============================================================================

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Endpoint URL; `{destination}` is replaced per send
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds; unset leaves requests unbounded
    #[serde(default)]
    pub request_timeout: Option<u64>,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Extra headers attached to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: None,
            connect_timeout: default_connect_timeout(),
            headers: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Liveness Responder
// ============================================================================

/// Liveness listener configuration; the port comes from `server_port.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessConfig {
    /// Interface address the responder binds to
    #[serde(default = "default_liveness_host")]
    pub host: String,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            host: default_liveness_host(),
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Zone and format used to stamp send log lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// IANA time zone name
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// strftime-style format
    #[serde(default = "default_time_format")]
    pub format: String,
}

impl ClockConfig {
    pub fn build(&self) -> Result<LocalClock, ConfigError> {
        LocalClock::new(&self.timezone, self.format.clone())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            format: default_time_format(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        Ok(FileConfig {
            enabled: self.enabled,
            path: PathBuf::from(self.path),
            append: self.append,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_resolve_in_dir() {
        let sources = SourcesConfig::in_dir("/srv/herald");
        assert_eq!(
            sources.path(&sources.tokens),
            PathBuf::from("/srv/herald/tokens.txt")
        );
        assert_eq!(
            sources.path(&sources.messages),
            PathBuf::from("/srv/herald/messages.txt")
        );
    }

    #[test]
    fn test_absolute_source_ignores_dir() {
        let sources = SourcesConfig::in_dir("/srv/herald");
        assert_eq!(
            sources.path("/etc/herald/tokens.txt"),
            PathBuf::from("/etc/herald/tokens.txt")
        );
    }

    #[test]
    fn test_transport_defaults() {
        let transport = TransportConfig::default();
        assert!(transport.endpoint.contains("{destination}"));
        assert!(transport.request_timeout.is_none());
        assert_eq!(transport.connect_timeout, 10);
        assert!(transport.headers.is_empty());
    }

    #[test]
    fn test_clock_defaults_build() {
        let clock = ClockConfig::default();
        assert_eq!(clock.timezone, "Asia/Kolkata");
        assert!(clock.build().is_ok());
    }

    #[test]
    fn test_logger_settings_conversion() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.format = "compact".to_string();

        let config = settings.into_logger_config().unwrap();
        assert!(config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(config.file.path, PathBuf::from("logs/herald.log"));
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "yaml".to_string();

        let err = settings.into_logger_config().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logger.file.format"));
    }

    #[test]
    fn test_settings_deserialize_partial_toml() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [transport]
                endpoint = "https://hooks.example.com/{destination}"
                request_timeout = 15

                [transport.headers]
                x-team = "ops"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.transport.request_timeout, Some(15));
        assert_eq!(settings.transport.headers.get("x-team").map(String::as_str), Some("ops"));
        assert_eq!(settings.sources, SourcesConfig::default());
        assert_eq!(settings.logger, LoggerSettings::default());
    }
}
