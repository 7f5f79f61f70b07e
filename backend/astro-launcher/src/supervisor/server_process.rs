use crate::process;
use crate::{LauncherError, LauncherResult};

use astro_config::ServerConfig;

use std::panic::Location;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tracing::{debug, info, warn};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the registration loop, the steady-state monitor and the shutdown
/// guard need from a running server.
#[async_trait]
pub trait SupervisedProcess: Send {
    fn pid(&self) -> u32;

    /// Non-blocking exit check.
    fn has_exited(&mut self) -> bool;

    /// Exit code, once the process has exited and reported one.
    fn exit_code(&self) -> Option<i32>;

    /// Ask the process to stop, escalating to a kill after the grace period.
    /// Calling this on an exited process does nothing.
    ///
    /// Blocks the calling thread while waiting; only for `Drop`.
    fn terminate(&mut self, reason: &str);

    /// Same as [`terminate`](Self::terminate), waiting on the runtime timer.
    async fn stop(&mut self, reason: &str);
}

/// The dedicated server, started by the launcher and owned by it.
pub struct ServerProcess {
    child: Child,
    pid: u32,
    started_at: DateTime<Utc>,
    shutdown_grace: Duration,
    exited: bool,
    exit_code: Option<i32>,
}

impl ServerProcess {
    /// Start the server executable from `server_dir`.
    #[track_caller]
    pub fn spawn(config: &ServerConfig, server_dir: &Path) -> LauncherResult<Self> {
        let location = ErrorLocation::from(Location::caller());
        let executable = server_dir.join(&config.executable);

        if !executable.is_file() {
            return Err(LauncherError::ExecutableNotFound {
                path: executable,
                location,
            });
        }

        let child = Command::new(&executable)
            .args(&config.arguments)
            .current_dir(server_dir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LauncherError::ProcessSpawn {
                path: executable.clone(),
                source,
                location,
            })?;

        let pid = child.id();
        info!("Server process started (PID {pid})");

        Ok(Self {
            child,
            pid,
            started_at: Utc::now(),
            shutdown_grace: config.shutdown_grace(),
            exited: false,
            exit_code: None,
        })
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn record_exit(&mut self, status: std::process::ExitStatus) {
        self.exited = true;
        self.exit_code = status.code();
        debug!("Server process {} exited: {status}", self.pid);
    }

    /// Send the graceful stop request. False if there is nothing to stop.
    fn request_stop(&mut self, reason: &str) -> bool {
        if self.has_exited() {
            return false;
        }

        info!("Stopping server (PID {}): {reason}", self.pid);
        if let Err(e) = process::request_termination(self.pid) {
            warn!("Graceful stop of PID {} failed: {e}", self.pid);
        }
        true
    }

    fn kill_after_grace(&mut self) {
        warn!(
            "Server did not stop within {}s, killing PID {}",
            self.shutdown_grace.as_secs(),
            self.pid
        );
        if let Err(e) = self.child.kill() {
            warn!("Failed to kill server process {}: {e}", self.pid);
        }
        match self.child.wait() {
            Ok(status) => self.record_exit(status),
            Err(e) => warn!("Failed to reap server process {}: {e}", self.pid),
        }
    }
}

#[async_trait]
impl SupervisedProcess for ServerProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn has_exited(&mut self) -> bool {
        if self.exited {
            return true;
        }

        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.record_exit(status);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Could not query server process {}: {e}", self.pid);
                false
            }
        }
    }

    fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    fn terminate(&mut self, reason: &str) {
        if !self.request_stop(reason) {
            return;
        }

        let deadline = Instant::now() + self.shutdown_grace;
        while Instant::now() < deadline {
            if self.has_exited() {
                info!("Server stopped");
                return;
            }
            std::thread::sleep(EXIT_POLL_INTERVAL);
        }

        self.kill_after_grace();
    }

    async fn stop(&mut self, reason: &str) {
        if !self.request_stop(reason) {
            return;
        }

        let deadline = tokio::time::Instant::now() + self.shutdown_grace;
        while tokio::time::Instant::now() < deadline {
            if self.has_exited() {
                info!("Server stopped");
                return;
            }
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }

        self.kill_after_grace();
    }
}
