//! Runtime configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A script path on the command line overrides the environment.

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use stockwatch_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "STOCKWATCH_LOG_FORMAT";
pub const SCRIPT_VAR: &str = "STOCKWATCH_SCRIPT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Log output format
    pub log_format: LogFormat,

    /// Command script to replay; `None` runs the built-in demo
    pub script: Option<PathBuf>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| {
                ConfigError::InvalidValue {
                    var: LOG_FORMAT_VAR.to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let script = match lookup(SCRIPT_VAR) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: SCRIPT_VAR.to_string(),
                    reason: "empty path".to_string(),
                });
            }
            Some(raw) => Some(PathBuf::from(raw)),
            None => None,
        };

        Ok(Self { log_format, script })
    }

    /// Apply command-line arguments (program name already stripped).
    ///
    /// The first positional argument is taken as the script path.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(path) = args.into_iter().next() {
            self.script = Some(PathBuf::from(path));
        }
        self
    }
}
