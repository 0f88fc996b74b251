//! Wall-clock stamps for send log lines.

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::config::error::ConfigError;

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_FORMAT: &str = "%I:%M %p";

/// Formats instants in one fixed zone, independent of the host's local zone
#[derive(Debug, Clone)]
pub struct LocalClock {
    zone: TimeZone,
    format: String,
}

impl LocalClock {
    /// Resolve `zone` from the bundled tz database
    pub fn new(zone: &str, format: impl Into<String>) -> Result<Self, ConfigError> {
        let zone = TimeZone::get(zone).map_err(|e| {
            ConfigError::ValidationError {
                field: "clock.timezone".to_string(),
                message: format!("Unknown time zone '{}': {}", zone, e),
            }
        })?;

        Ok(Self {
            zone,
            format: format.into(),
        })
    }

    pub fn stamp_now(&self) -> String {
        self.stamp(Timestamp::now())
    }

    pub fn stamp(&self, at: Timestamp) -> String {
        at.to_zoned(self.zone.clone()).strftime(&self.format).to_string()
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        // The bundled database always carries the default zone
        let zone = TimeZone::get(DEFAULT_TIMEZONE).unwrap_or(TimeZone::UTC);
        Self {
            zone,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}
