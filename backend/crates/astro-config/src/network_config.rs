use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_PROBE_TIMEOUT_SECS: u64 = 1;
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

pub const MAX_CONSOLE_ALERT_PAUSE_SECS: u64 = 60;
pub const DEFAULT_CONSOLE_ALERT_PAUSE_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub probe_timeout_secs: u64,
    /// External port-check service. Without one, probes connect directly to the public address.
    pub check_url: Option<String>,
    /// Pause after a console exposure alert so the operator sees it
    pub console_alert_pause_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            check_url: None,
            console_alert_pause_secs: DEFAULT_CONSOLE_ALERT_PAUSE_SECS,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.probe_timeout_secs < MIN_PROBE_TIMEOUT_SECS
            || self.probe_timeout_secs > MAX_PROBE_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "network.probe_timeout_secs must be {}-{}, got {}",
                MIN_PROBE_TIMEOUT_SECS, MAX_PROBE_TIMEOUT_SECS, self.probe_timeout_secs
            )));
        }

        if let Some(ref url) = self.check_url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(ConfigError::config(format!(
                "network.check_url must be an http(s) URL, got '{url}'"
            )));
        }

        if self.console_alert_pause_secs > MAX_CONSOLE_ALERT_PAUSE_SECS {
            return Err(ConfigError::config(format!(
                "network.console_alert_pause_secs must be 0-{}, got {}",
                MAX_CONSOLE_ALERT_PAUSE_SECS, self.console_alert_pause_secs
            )));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn console_alert_pause(&self) -> Duration {
        Duration::from_secs(self.console_alert_pause_secs)
    }
}
