//! Logging setup with file rotation.

use crate::{LauncherError, LauncherResult};

use astro_config::LoggingConfig;

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Which process is logging; each writes its own files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Launcher,
    Watchdog,
}

impl LogTarget {
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Launcher => "astro-launcher",
            Self::Watchdog => "astro-watchdog",
        }
    }

    /// The watchdog is detached, nobody reads its console.
    fn has_console(self) -> bool {
        matches!(self, Self::Launcher)
    }
}

/// Setup logging with console and rotating file output.
///
/// `RUST_LOG` overrides the configured level.
pub fn setup_logging(
    log_dir: &Path,
    config: &LoggingConfig,
    target: LogTarget,
) -> LauncherResult<()> {
    std::fs::create_dir_all(log_dir)?;

    let console_layer = target.has_console().then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_ansi(true)
    });

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(config.max_files)
        .filename_prefix(target.file_prefix())
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| LauncherError::logging(e.to_string()))?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LauncherError::logging(e.to_string()))?;

    Ok(())
}
