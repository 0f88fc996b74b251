//! Settings loader for herald
//!
//! Settings come from, in order of priority (lowest first):
//! 1. Built-in defaults
//! 2. A TOML file: `--config FILE`, else `HERALD_CONFIG_FILE`, else an
//!    optional `herald.toml` in the working directory
//! 3. `HERALD_*` environment variables

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for a specific settings file
const CONFIG_FILE_ENV: &str = "HERALD_CONFIG_FILE";

/// Settings file picked up from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "herald.toml";

/// Environment variable prefix for settings overrides
const ENV_PREFIX: &str = "HERALD";

/// Separator for nested settings keys in environment variables
const ENV_SEPARATOR: &str = "__";

#[derive(Debug)]
pub struct ConfigLoader {
    /// Explicit settings file; must exist when set
    config_file: Option<PathBuf>,
    /// Fallback file, optional
    default_file: PathBuf,
}

impl ConfigLoader {
    /// Loader honouring `HERALD_CONFIG_FILE`
    pub fn new() -> Self {
        Self {
            config_file: std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from),
            default_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Loader for an explicit file, taking precedence over the environment
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
            default_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// The explicit settings file, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load, deserialize and validate settings
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref path) => Self::add_file_source(builder, path, true)?,
            None => Self::add_file_source(builder, &self.default_file, false)?,
        };

        // HERALD_TRANSPORT__ENDPOINT -> transport.endpoint
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }

    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
