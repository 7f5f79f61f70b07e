//! Values the launcher needs from the dedicated server's own settings files.

use crate::{ConfigError, ConfigErrorResult, IniDocument};

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use log::debug;

pub const SETTINGS_DIR: &str = "Astro/Saved/Config/WindowsServer";
pub const SERVER_SETTINGS_FILE: &str = "AstroServerSettings.ini";
pub const ENGINE_SETTINGS_FILE: &str = "Engine.ini";
pub const SERVER_SETTINGS_SECTION: &str = "/Script/Astro.AstroServerSettings";
pub const ENGINE_URL_SECTION: &str = "URL";
pub const DEFAULT_GAME_PORT: u16 = 7777;

/// Settings read from the dedicated server's INI files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub public_ip: IpAddr,
    /// Game port the server listens on
    pub port: u16,
    /// Remote console port; must never be reachable from outside
    pub console_port: u16,
    /// Stable server identity, exchanged for a directory session ticket
    pub server_guid: String,
    pub server_name: Option<String>,
}

impl ServerSettings {
    /// Read settings from `<server_dir>/Astro/Saved/Config/WindowsServer`.
    pub fn load(server_dir: &Path) -> ConfigErrorResult<Self> {
        let settings_dir = server_dir.join(SETTINGS_DIR);
        let server_path = settings_dir.join(SERVER_SETTINGS_FILE);
        let engine_path = settings_dir.join(ENGINE_SETTINGS_FILE);

        let server_ini = Self::read_ini(&server_path)?;
        let engine_ini = if engine_path.exists() {
            Some(Self::read_ini(&engine_path)?)
        } else {
            debug!(
                "{} not found, using default game port {}",
                engine_path.display(),
                DEFAULT_GAME_PORT
            );
            None
        };

        Self::from_documents(&server_path, &server_ini, engine_ini.as_ref())
    }

    /// Build settings from already parsed documents.
    pub fn from_documents(
        server_path: &Path,
        server_ini: &IniDocument,
        engine_ini: Option<&IniDocument>,
    ) -> ConfigErrorResult<Self> {
        let public_ip_raw = Self::required(server_path, server_ini, "PublicIP")?;
        let public_ip: IpAddr = public_ip_raw.parse().map_err(|_| {
            ConfigError::settings(format!("PublicIP '{public_ip_raw}' is not an IP address"))
        })?;

        let console_raw = Self::required(server_path, server_ini, "ConsolePort")?;
        let console_port = Self::parse_port("ConsolePort", console_raw)?;

        let server_guid = Self::required(server_path, server_ini, "ServerGuid")?.to_string();

        let port = match engine_ini.and_then(|ini| ini.get(ENGINE_URL_SECTION, "Port")) {
            Some(raw) => Self::parse_port("Port", raw)?,
            None => DEFAULT_GAME_PORT,
        };

        if port == console_port {
            return Err(ConfigError::settings(format!(
                "game port and console port are both {port}"
            )));
        }

        let server_name = server_ini
            .get(SERVER_SETTINGS_SECTION, "ServerName")
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(Self {
            public_ip,
            port,
            console_port,
            server_guid,
            server_name,
        })
    }

    /// `"<PublicIP>:<Port>"`, the key the directory files this server under.
    pub fn address_key(&self) -> String {
        format!("{}:{}", self.public_ip, self.port)
    }

    fn required<'a>(
        server_path: &Path,
        server_ini: &'a IniDocument,
        key: &str,
    ) -> ConfigErrorResult<&'a str> {
        server_ini
            .get(SERVER_SETTINGS_SECTION, key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ConfigError::missing_setting(
                    server_path.to_path_buf(),
                    SERVER_SETTINGS_SECTION,
                    key,
                )
            })
    }

    fn parse_port(key: &str, raw: &str) -> ConfigErrorResult<u16> {
        match raw.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::settings(format!(
                "{key} '{raw}' is not a valid port"
            ))),
        }
    }

    fn read_ini(path: &PathBuf) -> ConfigErrorResult<IniDocument> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(IniDocument::parse(&contents))
    }
}
