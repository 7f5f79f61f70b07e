use std::panic::Location;
use std::path::PathBuf;

use astro_api::ApiError;
use astro_config::ConfigError;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Configuration invalid: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },

    #[error("Server executable not found at {path} {location}")]
    ExecutableNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to spawn server process {path}: {source} {location}")]
    ProcessSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error(
        "Server exited with code {exit_code:?} before registering \
         (after {elapsed_secs:.1}s, backoff {backoff_secs}s) {location}"
    )]
    ServerExitedBeforeRegistration {
        exit_code: Option<i32>,
        elapsed_secs: f64,
        backoff_secs: u64,
        location: ErrorLocation,
    },

    #[error("Could not authenticate with the session directory: {source} {location}")]
    Authentication {
        #[source]
        source: ApiError,
        location: ErrorLocation,
    },

    #[error("Failed to spawn watchdog daemon: {source} {location}")]
    WatchdogSpawn {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to schedule update helper: {source} {location}")]
    UpdateHelperSpawn {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Directory API error: {source} {location}")]
    Api {
        #[source]
        source: ApiError,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Logging setup failed: {message} {location}")]
    Logging {
        message: String,
        location: ErrorLocation,
    },
}

impl LauncherError {
    /// Whether this error is recoverable via retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::Config { .. } => {
                "Check Launcher.toml and the server's AstroServerSettings.ini. \
                   Delete Launcher.toml to fall back to defaults."
            }
            Self::ExecutableNotFound { .. } => {
                "Run the launcher from the dedicated server folder or pass it with --path."
            }
            Self::ProcessSpawn { .. } => {
                "The server executable could not be started. \
                   Check file permissions and that the installation is complete."
            }
            Self::ServerExitedBeforeRegistration { .. } => {
                "The dedicated server closed during startup. \
                   Check the server's own logs for a configuration problem."
            }
            Self::Authentication { .. } => {
                "The session directory could not be reached. \
                   Check the internet connection and the ServerGuid setting."
            }
            Self::WatchdogSpawn { .. } => {
                "The watchdog could not be started; the server may outlive the launcher."
            }
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }

    #[track_caller]
    pub fn watchdog_spawn(source: std::io::Error) -> Self {
        Self::WatchdogSpawn {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn update_helper_spawn(source: std::io::Error) -> Self {
        Self::UpdateHelperSpawn {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::Logging {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for LauncherError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source }
    }
}

impl From<std::io::Error> for LauncherError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ApiError> for LauncherError {
    #[track_caller]
    fn from(source: ApiError) -> Self {
        Self::Api {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
