use crate::{ConfigError, ConfigErrorResult, DEFAULT_EXECUTABLE, DEFAULT_SERVER_ARGUMENT};

use std::time::Duration;

use serde::Deserialize;

pub const MAX_SETTLE_SECS: u64 = 60;
pub const DEFAULT_SETTLE_SECS: u64 = 3;

pub const MIN_MONITOR_INTERVAL_SECS: u64 = 1;
pub const MAX_MONITOR_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 5;

pub const MIN_SHUTDOWN_GRACE_SECS: u64 = 1;
pub const MAX_SHUTDOWN_GRACE_SECS: u64 = 120;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// How the wrapped dedicated server is launched and supervised.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Executable name, resolved against the server directory
    pub executable: String,
    pub arguments: Vec<String>,
    /// Pause between stale-session cleanup and launch so the directory flushes old entries
    pub settle_secs: u64,
    /// Liveness poll interval once the server is registered
    pub monitor_interval_secs: u64,
    /// Time a graceful termination request is given before the process is killed
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            executable: String::from(DEFAULT_EXECUTABLE),
            arguments: vec![String::from(DEFAULT_SERVER_ARGUMENT)],
            settle_secs: DEFAULT_SETTLE_SECS,
            monitor_interval_secs: DEFAULT_MONITOR_INTERVAL_SECS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::config("server.executable must not be empty"));
        }

        if self.settle_secs > MAX_SETTLE_SECS {
            return Err(ConfigError::config(format!(
                "server.settle_secs must be 0-{}, got {}",
                MAX_SETTLE_SECS, self.settle_secs
            )));
        }

        if self.monitor_interval_secs < MIN_MONITOR_INTERVAL_SECS
            || self.monitor_interval_secs > MAX_MONITOR_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "server.monitor_interval_secs must be {}-{}, got {}",
                MIN_MONITOR_INTERVAL_SECS, MAX_MONITOR_INTERVAL_SECS, self.monitor_interval_secs
            )));
        }

        if self.shutdown_grace_secs < MIN_SHUTDOWN_GRACE_SECS
            || self.shutdown_grace_secs > MAX_SHUTDOWN_GRACE_SECS
        {
            return Err(ConfigError::config(format!(
                "server.shutdown_grace_secs must be {}-{}, got {}",
                MIN_SHUTDOWN_GRACE_SECS, MAX_SHUTDOWN_GRACE_SECS, self.shutdown_grace_secs
            )));
        }

        Ok(())
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
