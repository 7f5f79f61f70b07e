use crate::context::LauncherContext;
use crate::network;
use crate::supervisor::{
    BackoffState, LobbySnapshot, RegistrationPoller, RegistrationState, RegistrationTracker,
    ServerGuard, ServerProcess, SupervisedProcess,
};
use crate::update::{UpdateCoordinator, UpdateOutcome};
use crate::watchdog::{DaemonWatchdog, WatchdogLauncher, WatchdogLink};
use crate::{LauncherError, LauncherResult};

use astro_api::{DirectoryClient, SessionDirectory};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

/// How a launcher run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A newer launcher was scheduled to replace this one.
    UpdateScheduled,
    /// The registered server exited on its own.
    ServerStopped { exit_code: Option<i32> },
}

/// Drives one launcher run: update check, network check, directory
/// cleanup, server start, registration wait and steady-state monitoring.
pub struct Launcher<W: WatchdogLauncher = DaemonWatchdog> {
    ctx: LauncherContext,
    tracker: RegistrationTracker,
    watchdog: W,
}

impl Launcher<DaemonWatchdog> {
    pub fn new(ctx: LauncherContext) -> Self {
        let watchdog = DaemonWatchdog::new(&ctx.server_dir);
        Self::with_watchdog(ctx, watchdog)
    }
}

impl<W: WatchdogLauncher> Launcher<W> {
    pub fn with_watchdog(ctx: LauncherContext, watchdog: W) -> Self {
        Self {
            ctx,
            tracker: RegistrationTracker::new(),
            watchdog,
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.tracker.current()
    }

    /// Subscribe to registration state changes.
    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.tracker.subscribe()
    }

    /// Full launcher run against the configured session directory.
    pub async fn run(&self) -> LauncherResult<LaunchOutcome> {
        info!("Astroneer dedicated server launcher v{}", self.ctx.version);

        if self.check_for_update().await == UpdateOutcome::Scheduled {
            return Ok(LaunchOutcome::UpdateScheduled);
        }

        info!("Starting a new session");
        self.check_network().await;

        let directory = match self.connect_directory().await {
            Ok(directory) => directory,
            Err(e) => {
                self.tracker.fail(e.to_string());
                return Err(e);
            }
        };

        self.start_server(&directory).await
    }

    async fn check_for_update(&self) -> UpdateOutcome {
        if !self.ctx.config.update.enabled {
            debug!("Update check disabled");
            return UpdateOutcome::Disabled;
        }

        match UpdateCoordinator::from_context(&self.ctx) {
            Ok(coordinator) => coordinator.run().await,
            Err(e) => {
                warn!("Update check unavailable: {e}");
                UpdateOutcome::Unavailable
            }
        }
    }

    async fn check_network(&self) {
        let probe = network::probe_from_config(&self.ctx.config.network);
        let report = network::check_network_config(probe.as_ref(), &self.ctx.settings).await;

        if report.console_port_reachable {
            sleep(self.ctx.config.network.console_alert_pause()).await;
        }
    }

    /// Authenticate with the directory.
    ///
    /// Transient failures are retried until they clear, each wait longer than
    /// the last. A rejected identity or malformed request fails immediately.
    async fn connect_directory(&self) -> LauncherResult<DirectoryClient> {
        let cfg = &self.ctx.config.directory;
        let mut client =
            DirectoryClient::new(&cfg.base_url, &cfg.title_id, &cfg.sdk, cfg.request_timeout())?;
        let mut backoff = BackoffState::from_config(&self.ctx.config.registration);

        let mut attempt = 1u32;
        loop {
            match client.authenticate(&self.ctx.settings.server_guid).await {
                Ok(_) => {
                    debug!("Authenticated with {} after {attempt} attempt(s)", client.base_url);
                    return Ok(client);
                }
                Err(e) if e.is_transient() => {
                    backoff.increase();
                    warn!(
                        "Authentication attempt {attempt} failed ({e}), retrying in {}s",
                        backoff.interval_secs()
                    );
                    sleep(backoff.interval()).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(source) => {
                    error!("Authentication rejected: {source}");
                    return Err(LauncherError::Authentication {
                        source,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }
    }

    /// Start the server against `directory` and supervise it until it exits.
    ///
    /// The server is stopped when this future completes or is dropped.
    pub async fn start_server<D: SessionDirectory + ?Sized>(
        &self,
        directory: &D,
    ) -> LauncherResult<LaunchOutcome> {
        self.tracker.advance(RegistrationState::Starting);

        let address = self.ctx.settings.address_key();
        let baseline = deregister_stale(directory, &address).await;

        info!("Starting server process...");
        sleep(self.ctx.config.server.settle_interval()).await;

        let started_at = Instant::now();
        let process = match ServerProcess::spawn(&self.ctx.config.server, &self.ctx.server_dir) {
            Ok(process) => process,
            Err(e) => {
                error!("{e}");
                self.tracker.fail(e.to_string());
                return Err(e);
            }
        };
        let mut guard = ServerGuard::new(process);

        self.launch_watchdog(guard.pid());

        let result = self
            .supervise(directory, guard.process_mut(), baseline, started_at)
            .await;
        if let Err(e) = &result {
            self.tracker.fail(e.to_string());
        }

        guard.shutdown("supervision ended").await;
        result
    }

    /// Wait for `process` to register, then monitor it until it exits.
    async fn supervise<D: SessionDirectory + ?Sized, P: SupervisedProcess>(
        &self,
        directory: &D,
        process: &mut P,
        baseline: LobbySnapshot,
        started_at: Instant,
    ) -> LauncherResult<LaunchOutcome> {
        self.tracker.advance(RegistrationState::AwaitingRegistration);
        info!("Waiting for server to register...");

        let mut poller = RegistrationPoller::new(
            directory,
            &self.ctx.settings,
            baseline,
            &self.ctx.config.registration,
        );
        let registration = poller.wait_for_registration(process, started_at).await?;

        self.tracker.advance(RegistrationState::Registered {
            lobby_id: registration.lobby_id.clone(),
        });
        info!(
            "Server ready with ID {}. Took {:.1} seconds to register.",
            registration.lobby_id,
            registration.elapsed.as_secs_f64()
        );

        let exit_code = monitor(process, self.ctx.config.server.monitor_interval()).await;

        Ok(LaunchOutcome::ServerStopped { exit_code })
    }

    fn launch_watchdog(&self, console_pid: u32) {
        let link = WatchdogLink {
            launcher_pid: std::process::id(),
            console_pid,
        };

        if let Err(e) = self.watchdog.launch(link) {
            error!("{e}");
            warn!("Continuing without a watchdog");
        }
    }
}

/// Remove every session currently listed for `address` and return the
/// identifiers that were listed.
///
/// Best-effort: listing or deregistration failures are logged and the
/// launcher carries on.
pub async fn deregister_stale<D: SessionDirectory + ?Sized>(
    directory: &D,
    address: &str,
) -> LobbySnapshot {
    let sessions = match directory.list_sessions(address).await {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Could not list previous sessions for {address} ({e}), continuing");
            return LobbySnapshot::default();
        }
    };

    if !sessions.is_empty() {
        info!("Attempting to deregister all ({}) servers...", sessions.len());
    }

    for session in &sessions {
        match directory.deregister_session(&session.lobby_id).await {
            Ok(()) => debug!("Deregistered stale session {}", session.lobby_id),
            Err(e) => warn!("Failed to deregister {}: {e}", session.lobby_id),
        }
    }

    LobbySnapshot::from_sessions(&sessions)
}

/// Wait for the server to exit, checking every `interval`.
async fn monitor<P: SupervisedProcess>(process: &mut P, interval: Duration) -> Option<i32> {
    loop {
        if process.has_exited() {
            let exit_code = process.exit_code();
            match exit_code {
                Some(0) => info!("Server exited"),
                other => warn!("Server exited with code {other:?}"),
            }
            return exit_code;
        }
        sleep(interval).await;
    }
}
