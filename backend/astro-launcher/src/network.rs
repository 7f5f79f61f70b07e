//! Advisory reachability checks for the game and console ports.

use astro_config::{NetworkConfig, ServerSettings};

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Answers whether `address:port` can be reached from outside.
///
/// Any failure counts as unreachable; probes never return errors.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn probe(&self, address: IpAddr, port: u16) -> bool;
}

/// Connects to the address directly over TCP.
pub struct DirectProbe {
    timeout: Duration,
}

impl DirectProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ReachabilityProbe for DirectProbe {
    async fn probe(&self, address: IpAddr, port: u16) -> bool {
        let target = SocketAddr::new(address, port);
        match timeout(self.timeout, TcpStream::connect(target)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Probe of {target} failed: {e}");
                false
            }
            Err(_) => {
                debug!("Probe of {target} timed out");
                false
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    reachable: bool,
}

/// Asks an external port-check service, which sees the host from outside
/// the local network.
///
/// `GET {url}?ip={address}&port={port}` answering `{"reachable": bool}`.
pub struct RemoteProbe {
    url: String,
    client: reqwest::Client,
}

impl RemoteProbe {
    pub fn new(url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    async fn check(&self, address: IpAddr, port: u16) -> reqwest::Result<bool> {
        let url = format!("{}?ip={address}&port={port}", self.url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: CheckResponse = response.json().await?;
        Ok(body.reachable)
    }
}

#[async_trait]
impl ReachabilityProbe for RemoteProbe {
    async fn probe(&self, address: IpAddr, port: u16) -> bool {
        self.check(address, port).await.unwrap_or_else(|e| {
            debug!("Port check for {address}:{port} failed: {e}");
            false
        })
    }
}

/// Probe selected by the config: the remote checker when one is set,
/// otherwise a direct connection.
pub fn probe_from_config(config: &NetworkConfig) -> Box<dyn ReachabilityProbe> {
    if let Some(url) = &config.check_url {
        match RemoteProbe::new(url, config.probe_timeout()) {
            Ok(probe) => return Box::new(probe),
            Err(e) => warn!("Port checker {url} unusable ({e}), probing directly"),
        }
    }
    Box::new(DirectProbe::new(config.probe_timeout()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkWarning {
    /// Game port unreachable: port forwarding or NAT loopback problem.
    PortForwarding { port: u16 },
    /// Console port reachable from outside.
    ConsoleExposed { port: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkReport {
    pub game_port_reachable: bool,
    pub console_port_reachable: bool,
}

impl NetworkReport {
    /// The game port should be reachable, the console port should not.
    pub fn warnings(&self, settings: &ServerSettings) -> Vec<NetworkWarning> {
        let mut warnings = Vec::new();
        if !self.game_port_reachable {
            warnings.push(NetworkWarning::PortForwarding {
                port: settings.port,
            });
        }
        if self.console_port_reachable {
            warnings.push(NetworkWarning::ConsoleExposed {
                port: settings.console_port,
            });
        }
        warnings
    }
}

/// Probe both ports and log the verdict.
pub async fn check_network_config(
    probe: &dyn ReachabilityProbe,
    settings: &ServerSettings,
) -> NetworkReport {
    info!("Checking network configuration...");

    let (game_port_reachable, console_port_reachable) = tokio::join!(
        probe.probe(settings.public_ip, settings.port),
        probe.probe(settings.public_ip, settings.console_port),
    );
    let report = NetworkReport {
        game_port_reachable,
        console_port_reachable,
    };

    if game_port_reachable {
        info!("Server network configuration good!");
    }
    if !console_port_reachable {
        info!("Remote console network configuration good!");
    }

    for warning in report.warnings(settings) {
        match warning {
            NetworkWarning::PortForwarding { port } => {
                warn!("I can't seem to validate your network settings..");
                warn!("Make sure to Port Forward ({port}) and enable NAT Loopback");
                warn!("If nobody can connect, Port Forward.");
                warn!("If others are able to connect, but you aren't, enable NAT Loopback.");
            }
            NetworkWarning::ConsoleExposed { port } => {
                warn!("SECURITY ALERT: Your console port ({port}) is Port Forwarded!");
                warn!(
                    "Anyone who can reach it can control your server. \
                     Remove the port forward for {port}."
                );
            }
        }
    }

    report
}
