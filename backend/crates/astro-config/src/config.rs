use crate::{
    CONFIG_FILENAME, ConfigError, ConfigErrorResult, DirectoryConfig, LogLevel, LoggingConfig,
    NetworkConfig, RegistrationConfig, ServerConfig, UpdateConfig, WatchdogConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub registration: RegistrationConfig,
    pub directory: DirectoryConfig,
    pub update: UpdateConfig,
    pub network: NetworkConfig,
    pub watchdog: WatchdogConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load launcher config for a server directory.
    ///
    /// Loading order:
    /// 1. `<server_dir>/Launcher.toml` if it exists, else defaults
    /// 2. ASTRO_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(server_dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = Self::path_in(server_dir);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Location of the config file inside a server directory.
    pub fn path_in(server_dir: &Path) -> PathBuf {
        server_dir.join(CONFIG_FILENAME)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.registration.validate()?;
        self.directory.validate()?;
        self.update.validate()?;
        self.network.validate()?;
        self.watchdog.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Absolute log directory for a server directory.
    pub fn log_dir(&self, server_dir: &Path) -> PathBuf {
        server_dir.join(&self.logging.dir)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {} {:?} (settle {}s, monitor every {}s, grace {}s)",
            self.server.executable,
            self.server.arguments,
            self.server.settle_secs,
            self.server.monitor_interval_secs,
            self.server.shutdown_grace_secs
        );
        info!(
            "  registration: backoff={}s +{}s (on idle: {})",
            self.registration.initial_backoff_secs,
            self.registration.backoff_step_secs,
            self.registration.backoff_on_idle
        );
        info!(
            "  directory: {} (title {})",
            self.directory.base_url, self.directory.title_id
        );
        info!(
            "  update: {} ({})",
            if self.update.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.update.feed_url
        );
        info!(
            "  network: probe timeout={}s, checker={}",
            self.network.probe_timeout_secs,
            self.network.check_url.as_deref().unwrap_or("direct")
        );
        info!("  watchdog: every {}ms", self.watchdog.poll_interval_ms);
        info!(
            "  logging: {} in {} (keep {})",
            *self.logging.level, self.logging.dir, self.logging.max_files
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("ASTRO_SERVER_EXECUTABLE", &mut self.server.executable);
        Self::apply_env_parse("ASTRO_SETTLE_SECS", &mut self.server.settle_secs);

        // Registration
        Self::apply_env_parse(
            "ASTRO_INITIAL_BACKOFF_SECS",
            &mut self.registration.initial_backoff_secs,
        );
        Self::apply_env_bool(
            "ASTRO_BACKOFF_ON_IDLE",
            &mut self.registration.backoff_on_idle,
        );

        // Directory
        Self::apply_env_string("ASTRO_DIRECTORY_URL", &mut self.directory.base_url);

        // Update
        Self::apply_env_bool("ASTRO_UPDATE_ENABLED", &mut self.update.enabled);
        Self::apply_env_string("ASTRO_UPDATE_FEED_URL", &mut self.update.feed_url);

        // Network
        Self::apply_env_option_string("ASTRO_NETWORK_CHECK_URL", &mut self.network.check_url);

        // Watchdog
        Self::apply_env_parse(
            "ASTRO_WATCHDOG_INTERVAL_MS",
            &mut self.watchdog.poll_interval_ms,
        );

        // Logging
        if let Ok(val) = std::env::var("ASTRO_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lenient(&val);
        }
        Self::apply_env_string("ASTRO_LOG_DIR", &mut self.logging.dir);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = if val.is_empty() { None } else { Some(val) };
        }
    }
}
