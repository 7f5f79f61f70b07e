use astro_config::{Config, ServerSettings};

use std::path::{Component, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one launcher run needs, owned in one place and handed to
/// each component.
#[derive(Debug, Clone)]
pub struct LauncherContext {
    pub server_dir: PathBuf,
    pub config: Config,
    pub settings: ServerSettings,
    pub version: &'static str,
    /// Running as an installed binary rather than through cargo.
    pub standalone: bool,
    /// `--noupdate` was given.
    pub disable_auto_update: bool,
}

impl LauncherContext {
    pub fn new(
        server_dir: PathBuf,
        config: Config,
        settings: ServerSettings,
        disable_auto_update: bool,
    ) -> Self {
        Self {
            server_dir,
            config,
            settings,
            version: VERSION,
            standalone: is_standalone_executable(),
            disable_auto_update,
        }
    }
}

/// False when started by cargo or from a cargo `target` directory.
pub fn is_standalone_executable() -> bool {
    if std::env::var_os("CARGO").is_some() {
        return false;
    }

    match std::env::current_exe() {
        Ok(exe) => !exe
            .components()
            .any(|c| c == Component::Normal("target".as_ref())),
        Err(_) => false,
    }
}
