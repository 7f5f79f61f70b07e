use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_INITIAL_BACKOFF_SECS: u64 = 1;
pub const MAX_INITIAL_BACKOFF_SECS: u64 = 60;
pub const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 2;

pub const MIN_BACKOFF_STEP_SECS: u64 = 1;
pub const MAX_BACKOFF_STEP_SECS: u64 = 30;
pub const DEFAULT_BACKOFF_STEP_SECS: u64 = 1;

pub const DEFAULT_BACKOFF_ON_IDLE: bool = true;

/// Registration polling against the session directory.
///
/// There is deliberately no deadline: the poll loop only ends on
/// registration or when the wrapped server exits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Interval before the first retry
    pub initial_backoff_secs: u64,
    /// Amount added to the interval after each unsuccessful tick
    pub backoff_step_secs: u64,
    /// Also grow the interval on ticks where the query succeeded but nothing new was listed
    pub backoff_on_idle: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            initial_backoff_secs: DEFAULT_INITIAL_BACKOFF_SECS,
            backoff_step_secs: DEFAULT_BACKOFF_STEP_SECS,
            backoff_on_idle: DEFAULT_BACKOFF_ON_IDLE,
        }
    }
}

impl RegistrationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.initial_backoff_secs < MIN_INITIAL_BACKOFF_SECS
            || self.initial_backoff_secs > MAX_INITIAL_BACKOFF_SECS
        {
            return Err(ConfigError::config(format!(
                "registration.initial_backoff_secs must be {}-{}, got {}",
                MIN_INITIAL_BACKOFF_SECS, MAX_INITIAL_BACKOFF_SECS, self.initial_backoff_secs
            )));
        }

        if self.backoff_step_secs < MIN_BACKOFF_STEP_SECS
            || self.backoff_step_secs > MAX_BACKOFF_STEP_SECS
        {
            return Err(ConfigError::config(format!(
                "registration.backoff_step_secs must be {}-{}, got {}",
                MIN_BACKOFF_STEP_SECS, MAX_BACKOFF_STEP_SECS, self.backoff_step_secs
            )));
        }

        Ok(())
    }
}
