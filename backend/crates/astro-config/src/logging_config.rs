use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_LOG_FILES, LogLevel,
};

use serde::Deserialize;

pub const MIN_MAX_LOG_FILES: usize = 1;
pub const MAX_MAX_LOG_FILES: usize = 365;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log directory, relative to the server directory
    pub dir: String,
    /// Daily log files kept before rotation deletes the oldest
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            dir: String::from(DEFAULT_LOG_DIRECTORY),
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.trim().is_empty() || std::path::Path::new(&self.dir).is_absolute() {
            return Err(ConfigError::logging(
                "logging.dir must be a non-empty relative path",
            ));
        }

        if self.max_files < MIN_MAX_LOG_FILES || self.max_files > MAX_MAX_LOG_FILES {
            return Err(ConfigError::logging(format!(
                "logging.max_files must be {}-{}, got {}",
                MIN_MAX_LOG_FILES, MAX_MAX_LOG_FILES, self.max_files
            )));
        }

        Ok(())
    }
}
