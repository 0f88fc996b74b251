use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::error::ConfigError;

/// Application-wide error type.
///
/// Per-send failures never show up here: they are folded into a
/// [`SendOutcome`](crate::dispatch::SendOutcome) at the send site. Only
/// startup problems and dispatcher invariant violations become an `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required text source is missing, unreadable or empty
    #[error("Missing required configuration: {item} (expected in {path})")]
    MissingSource { item: &'static str, path: PathBuf },

    /// Settings file or environment overrides are invalid
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The liveness listener could not be bound
    #[error("Failed to bind liveness listener on {address}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Configuration error without an underlying cause
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Configuration {
            key: key.into(),
            source: anyhow::anyhow!(reason.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_source_message_names_item_and_path() {
        let err = AppError::MissingSource {
            item: "credentials",
            path: PathBuf::from("conf/tokens.txt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("credentials"));
        assert!(msg.contains("conf/tokens.txt"));
    }

    #[test]
    fn test_validation_error_keeps_field_as_key() {
        let err: AppError = ConfigError::validation("clock.timezone", "unknown zone").into();
        match err {
            AppError::Configuration { key, .. } => assert_eq!(key, "clock.timezone"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_configuration_helper_has_source() {
        let err = AppError::configuration("dispatch", "no destinations");
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Configuration error: dispatch");
    }
}
