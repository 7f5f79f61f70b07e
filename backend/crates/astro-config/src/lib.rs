mod config;
mod directory_config;
mod error;
mod ini;
mod log_level;
mod logging_config;
mod network_config;
mod registration_config;
mod server_config;
mod server_settings;
mod update_config;
mod watchdog_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use directory_config::DirectoryConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use ini::IniDocument;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use network_config::NetworkConfig;
pub use registration_config::RegistrationConfig;
pub use server_config::ServerConfig;
pub use server_settings::ServerSettings;
pub use update_config::UpdateConfig;
pub use watchdog_config::WatchdogConfig;

pub const CONFIG_FILENAME: &str = "Launcher.toml";

const DEFAULT_EXECUTABLE: &str = "AstroServer.exe";
const DEFAULT_SERVER_ARGUMENT: &str = "-log";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_MAX_LOG_FILES: usize = 7;
