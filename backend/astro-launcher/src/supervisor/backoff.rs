use astro_config::RegistrationConfig;

use std::time::Duration;

/// Poll interval of one registration wait loop.
///
/// Only ever grows. A new value is created for each startup sequence;
/// there is intentionally no way to reset an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffState {
    interval_secs: u64,
    step_secs: u64,
}

impl BackoffState {
    pub fn new(initial_secs: u64, step_secs: u64) -> Self {
        Self {
            interval_secs: initial_secs,
            step_secs,
        }
    }

    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(config.initial_backoff_secs, config.backoff_step_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Grow the interval by one step.
    pub fn increase(&mut self) {
        self.interval_secs = self.interval_secs.saturating_add(self.step_secs);
    }
}
