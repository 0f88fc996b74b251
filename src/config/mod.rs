//! Configuration for herald
//!
//! Two layers:
//! - [`Settings`]: ambient settings (logger, transport, liveness host, clock)
//!   from an optional TOML file and `HERALD_*` environment variables
//! - [`Configuration`]: the broadcast data read once from plain text files

pub mod broadcast;
pub mod error;
pub mod loader;
pub mod settings;
pub mod sources;
pub mod validation;

pub use broadcast::Configuration;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ClockConfig, LivenessConfig, LoggerSettings, Settings, SourcesConfig, TransportConfig,
};
