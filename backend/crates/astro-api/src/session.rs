use std::collections::HashMap;
use std::net::IpAddr;

use serde::Deserialize;

/// Tag the directory files a dedicated server under (`"<ip>:<port>"`)
pub const GAME_ID_TAG: &str = "gameId";

/// One published, joinable instance of a dedicated server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    #[serde(rename = "LobbyID")]
    pub lobby_id: String,
    #[serde(rename = "ServerIPV4Address", default)]
    pub server_ipv4_address: Option<String>,
    #[serde(rename = "ServerPort", default)]
    pub server_port: Option<u16>,
    #[serde(rename = "Tags", default)]
    pub tags: HashMap<String, String>,
}

impl Session {
    /// Whether this session was published by a server listening on `ip:port`.
    ///
    /// Prefers the explicit address fields; falls back to the `gameId` tag.
    pub fn listens_on(&self, ip: IpAddr, port: u16) -> bool {
        if let (Some(address), Some(server_port)) = (&self.server_ipv4_address, self.server_port)
            && let Ok(parsed) = address.parse::<IpAddr>()
        {
            return parsed == ip && server_port == port;
        }

        self.tags
            .get(GAME_ID_TAG)
            .is_some_and(|game_id| *game_id == format!("{ip}:{port}"))
    }
}
