mod config;
mod ini;
mod server_settings;

use std::env;
use std::path::Path;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Create an empty server directory
pub(crate) fn setup_server_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write `Launcher.toml` into a server directory
pub(crate) fn write_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join(crate::CONFIG_FILENAME), contents).unwrap();
}

/// Write the dedicated server's INI files into a server directory
pub(crate) fn write_server_ini(dir: &Path, server_settings: &str, engine: Option<&str>) {
    let settings_dir = dir.join(crate::server_settings::SETTINGS_DIR);
    std::fs::create_dir_all(&settings_dir).unwrap();
    std::fs::write(
        settings_dir.join(crate::server_settings::SERVER_SETTINGS_FILE),
        server_settings,
    )
    .unwrap();
    if let Some(engine) = engine {
        std::fs::write(
            settings_dir.join(crate::server_settings::ENGINE_SETTINGS_FILE),
            engine,
        )
        .unwrap();
    }
}
