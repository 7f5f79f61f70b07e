use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_FEED_URL: &str =
    "https://api.github.com/repos/ricky-davis/AstroLauncher/releases/latest";
pub const DEFAULT_RELEASE_PAGE_URL: &str =
    "https://github.com/ricky-davis/AstroLauncher/releases/latest";
pub const DEFAULT_UPDATE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Allow the launcher to replace itself when a newer release exists
    pub enabled: bool,
    pub feed_url: String,
    /// Page shown to the operator in the update notice
    pub release_page_url: String,
    pub request_timeout_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            feed_url: String::from(DEFAULT_FEED_URL),
            release_page_url: String::from(DEFAULT_RELEASE_PAGE_URL),
            request_timeout_secs: DEFAULT_UPDATE_TIMEOUT_SECS,
        }
    }
}

impl UpdateConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.feed_url.starts_with("http://") && !self.feed_url.starts_with("https://") {
            return Err(ConfigError::config(format!(
                "update.feed_url must be an http(s) URL, got '{}'",
                self.feed_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::config(
                "update.request_timeout_secs must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
