use crate::supervisor::{BackoffState, LobbySnapshot, SupervisedProcess};
use crate::{LauncherError, LauncherResult};

use astro_api::{ApiError, SessionDirectory};
use astro_config::{RegistrationConfig, ServerSettings};

use std::net::IpAddr;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, warn};

/// Longest stretch the poller sleeps without checking on the server.
const LIVENESS_SLICE: Duration = Duration::from_millis(500);

/// A server that showed up in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub lobby_id: String,
    /// Time from process start to the successful directory query.
    pub elapsed: Duration,
    /// Backoff interval at the moment registration was seen.
    pub backoff_secs: u64,
    /// Number of directory queries made.
    pub queries: u32,
}

/// Waits for a freshly started server to register itself.
///
/// Success means the directory lists a session that was not in `baseline`
/// and that advertises this server's address and port. The baseline is the
/// set captured before the server was started and never changes while
/// polling.
pub struct RegistrationPoller<'a, D: SessionDirectory + ?Sized> {
    directory: &'a D,
    address_key: String,
    public_ip: IpAddr,
    port: u16,
    baseline: LobbySnapshot,
    backoff: BackoffState,
    backoff_on_idle: bool,
}

impl<'a, D: SessionDirectory + ?Sized> RegistrationPoller<'a, D> {
    pub fn new(
        directory: &'a D,
        settings: &ServerSettings,
        baseline: LobbySnapshot,
        config: &RegistrationConfig,
    ) -> Self {
        Self {
            directory,
            address_key: settings.address_key(),
            public_ip: settings.public_ip,
            port: settings.port,
            baseline,
            backoff: BackoffState::from_config(config),
            backoff_on_idle: config.backoff_on_idle,
        }
    }

    pub fn backoff(&self) -> BackoffState {
        self.backoff
    }

    /// Poll until the server registers or its process exits.
    ///
    /// `started_at` is when the server process was spawned.
    pub async fn wait_for_registration<P: SupervisedProcess>(
        &mut self,
        process: &mut P,
        started_at: Instant,
    ) -> LauncherResult<Registration> {
        let mut queries = 0u32;

        loop {
            if process.has_exited() {
                return Err(self.exited_early(process, started_at));
            }

            queries += 1;
            let pause = match self.directory.list_sessions(&self.address_key).await {
                Ok(sessions) => {
                    let current = LobbySnapshot::from_sessions(&sessions);
                    let added = current.added_since(&self.baseline);

                    let registered = sessions.iter().find(|s| {
                        added.contains(s.lobby_id.as_str()) && s.listens_on(self.public_ip, self.port)
                    });

                    if let Some(session) = registered {
                        return Ok(Registration {
                            lobby_id: session.lobby_id.clone(),
                            elapsed: started_at.elapsed(),
                            backoff_secs: self.backoff.interval_secs(),
                            queries,
                        });
                    }

                    if added.is_empty() {
                        debug!("Server not registered yet");
                    } else {
                        debug!(
                            "{} new session(s) listed but none on {}",
                            added.len(),
                            self.address_key
                        );
                    }

                    let pause = self.backoff.interval();
                    if self.backoff_on_idle {
                        self.backoff.increase();
                    }
                    pause
                }
                Err(e) => {
                    self.backoff.increase();
                    let pause = self.error_pause(&e);
                    warn!(
                        "Failed to check server registration ({e}). Retrying in {}s",
                        pause.as_secs()
                    );
                    pause
                }
            };

            if !self.pause_while_running(process, pause).await {
                return Err(self.exited_early(process, started_at));
            }
        }
    }

    /// A rate-limited response may ask for a longer wait than the current
    /// interval; never wait less than the interval.
    fn error_pause(&self, error: &ApiError) -> Duration {
        let interval = self.backoff.interval();
        match error {
            ApiError::RateLimited {
                retry_after_secs: Some(secs),
                ..
            } => interval.max(Duration::from_secs(*secs)),
            _ => interval,
        }
    }

    /// Sleep for `duration`, returning early (false) if the process exits.
    async fn pause_while_running<P: SupervisedProcess>(
        &self,
        process: &mut P,
        duration: Duration,
    ) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if process.has_exited() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            sleep(LIVENESS_SLICE.min(deadline - now)).await;
        }
    }

    #[track_caller]
    fn exited_early<P: SupervisedProcess>(&self, process: &P, started_at: Instant) -> LauncherError {
        let exit_code = process.exit_code();
        error!("Server was closed before registration (exit code {exit_code:?}). Exiting...");

        LauncherError::ServerExitedBeforeRegistration {
            exit_code,
            elapsed_secs: started_at.elapsed().as_secs_f64(),
            backoff_secs: self.backoff.interval_secs(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
