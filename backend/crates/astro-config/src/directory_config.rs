use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_DIRECTORY_URL: &str = "https://5EA1.playfabapi.com";
pub const DEFAULT_TITLE_ID: &str = "5EA1";
pub const DEFAULT_SDK: &str = "UE4MKPL-1.19.190610";

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Remote session directory the dedicated server registers with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub title_id: String,
    /// SDK identifier sent with every call
    pub sdk: String,
    pub request_timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_DIRECTORY_URL),
            title_id: String::from(DEFAULT_TITLE_ID),
            sdk: String::from(DEFAULT_SDK),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl DirectoryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::config(format!(
                "directory.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.title_id.trim().is_empty() {
            return Err(ConfigError::config("directory.title_id must not be empty"));
        }

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS
            || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "directory.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
