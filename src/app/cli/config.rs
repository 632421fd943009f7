//! TOML configuration file loading
//!
//! The configuration file uses the long option names as keys:
//!
//! ```toml
//! workers = 8
//! items = 1000
//! capacity = 16
//! max-delay-ms = 5
//! log-level = "debug"
//! ```
//!
//! Values given on the command line always take precedence.

use super::args::{Args, OutputFormat};
use crate::app::pipeline::PipelineConfig;
use crate::core::error_handling::ContextualError;
use crate::core::validation::{
    validate_index_range, validate_log_level, validate_non_negative_toml, validate_positive_toml,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_ITEMS: usize = 32;
pub const DEFAULT_CAPACITY: usize = 8;
pub const DEFAULT_MAX_DELAY_MS: u64 = 20;

/// Configuration problems; all of them are reported to the user as-is
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("Configuration file not found"),
            ConfigError::Read { .. } => Some("Configuration file could not be read"),
            ConfigError::Parse { .. } => Some("Configuration file is not valid TOML"),
            ConfigError::Invalid { message } => Some(message),
        }
    }
}

/// `<config dir>/reorder/reorder.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reorder").join("reorder.toml"))
}

/// Read and parse a configuration file into a raw table
pub async fn read_config_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

    toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Args {
    /// Load the configuration file and merge it under the command line
    ///
    /// An explicitly named file must exist; the default location is only
    /// used when present. Returns the path that was loaded, if any.
    pub async fn load_config_file(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let config_path = match self.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => default_config_path().filter(|path| path.exists()),
        };

        let Some(path) = config_path else {
            return Ok(None);
        };

        let config = read_config_table(&path).await?;
        Self::apply_toml_values(self, &config)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(Some(path))
    }

    /// Apply TOML configuration values to fields the command line left unset
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ConfigError> {
        for (key, target) in [
            ("workers", &mut args.workers),
            ("items", &mut args.items),
            ("capacity", &mut args.capacity),
        ] {
            if let Some(value) = config.get(key) {
                let parsed = validate_positive_toml(key, value).map_err(ConfigError::invalid)?;
                target.get_or_insert(parsed);
            }
        }

        for (key, target) in [
            ("baseline", &mut args.baseline),
            ("max-delay-ms", &mut args.max_delay_ms),
        ] {
            if let Some(value) = config.get(key) {
                let parsed =
                    validate_non_negative_toml(key, value).map_err(ConfigError::invalid)?;
                target.get_or_insert(parsed);
            }
        }

        if let Some(verbose) = config.get("verbose").and_then(|v| v.as_bool()) {
            args.verbose |= verbose;
        }
        if !args.color && !args.no_color {
            if let Some(color) = config.get("color").and_then(|v| v.as_bool()) {
                args.color = color;
                args.no_color = !color;
            }
        }
        if args.output.is_none() {
            if let Some(output) = config.get("output").and_then(|v| v.as_str()) {
                args.output = Some(match output {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    other => {
                        return Err(ConfigError::invalid(format!(
                            "'output' must be \"text\" or \"json\", got \"{}\"",
                            other
                        )))
                    }
                });
            }
        }

        if args.log_level.is_none() {
            if let Some(log_level) = config.get("log-level").and_then(|v| v.as_str()) {
                let log_level = validate_log_level(log_level).map_err(ConfigError::invalid)?;
                args.log_level = Some(log_level.to_string());
            }
        }
        if args.log_file.is_none() {
            if let Some(log_file) = config.get("log-file").and_then(|v| v.as_str()) {
                args.log_file = Some(PathBuf::from(log_file));
            }
        }
        if args.log_format.is_none() {
            if let Some(log_format) = config.get("log-format").and_then(|v| v.as_str()) {
                if log_format.parse::<crate::core::logging::LogFormat>().is_err() {
                    return Err(ConfigError::invalid(format!(
                        "'log-format' must be one of text, ext, json; got \"{}\"",
                        log_format
                    )));
                }
                args.log_format = Some(log_format.to_string());
            }
        }

        Ok(())
    }

    /// Resolve the pipeline settings, filling in defaults
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let config = PipelineConfig {
            workers: self.workers.unwrap_or(DEFAULT_WORKERS),
            items: self.items.unwrap_or(DEFAULT_ITEMS),
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            baseline: self.baseline.unwrap_or(0),
            max_delay_ms: self.max_delay_ms.unwrap_or(DEFAULT_MAX_DELAY_MS),
            verbose: self.verbose,
        };

        validate_index_range(config.baseline, config.items).map_err(ConfigError::invalid)?;
        Ok(config)
    }
}
