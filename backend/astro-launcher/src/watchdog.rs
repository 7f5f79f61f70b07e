//! Watchdog daemon.
//!
//! A detached copy of the launcher binary started with `--daemon`. It
//! watches the launcher and the server by PID, and once either is gone it
//! stops the other, so neither outlives its partner even when the launcher
//! is killed without a chance to clean up.

use crate::process;
use crate::{LauncherError, LauncherResult};

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

/// The pair of processes a watchdog ties together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogLink {
    pub launcher_pid: u32,
    pub console_pid: u32,
}

/// Which side disappeared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    LauncherExited,
    ConsoleExited,
    BothExited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    /// Both processes alive.
    Running,
    /// One side is gone, `survivor` must be stopped.
    TerminateSibling {
        survivor: u32,
        outcome: WatchdogOutcome,
    },
    Exited(WatchdogOutcome),
}

/// Access to the OS process table.
pub trait ProcessTable {
    fn is_alive(&self, pid: u32) -> bool;
    fn terminate(&self, pid: u32) -> io::Result<()>;
}

/// The real process table.
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn is_alive(&self, pid: u32) -> bool {
        process::is_process_running(pid)
    }

    fn terminate(&self, pid: u32) -> io::Result<()> {
        process::request_termination(pid).or_else(|e| {
            warn!("Graceful stop of PID {pid} failed ({e}), killing");
            process::force_kill(pid)
        })
    }
}

pub struct Watchdog<T: ProcessTable = SystemProcessTable> {
    link: WatchdogLink,
    table: T,
    poll_interval: Duration,
}

impl Watchdog<SystemProcessTable> {
    pub fn new(link: WatchdogLink, poll_interval: Duration) -> Self {
        Self::with_table(link, SystemProcessTable, poll_interval)
    }
}

impl<T: ProcessTable> Watchdog<T> {
    pub fn with_table(link: WatchdogLink, table: T, poll_interval: Duration) -> Self {
        Self {
            link,
            table,
            poll_interval,
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// One look at both processes.
    pub fn observe(&self) -> WatchdogState {
        let launcher = self.table.is_alive(self.link.launcher_pid);
        let console = self.table.is_alive(self.link.console_pid);

        match (launcher, console) {
            (true, true) => WatchdogState::Running,
            (false, true) => WatchdogState::TerminateSibling {
                survivor: self.link.console_pid,
                outcome: WatchdogOutcome::LauncherExited,
            },
            (true, false) => WatchdogState::TerminateSibling {
                survivor: self.link.launcher_pid,
                outcome: WatchdogOutcome::ConsoleExited,
            },
            (false, false) => WatchdogState::Exited(WatchdogOutcome::BothExited),
        }
    }

    /// Watch until one side exits, stop the other and return.
    pub async fn run(&self) -> WatchdogOutcome {
        info!(
            "Watching launcher PID {} and server PID {}",
            self.link.launcher_pid, self.link.console_pid
        );

        loop {
            match self.observe() {
                WatchdogState::Running => sleep(self.poll_interval).await,
                WatchdogState::TerminateSibling { survivor, outcome } => {
                    info!("{outcome:?}, stopping PID {survivor}");
                    if let Err(e) = self.table.terminate(survivor) {
                        warn!("Failed to stop PID {survivor}: {e}");
                    }
                    return outcome;
                }
                WatchdogState::Exited(outcome) => {
                    info!("Both processes are gone");
                    return outcome;
                }
            }
        }
    }
}

/// Starts a watchdog for a freshly spawned server.
pub trait WatchdogLauncher {
    fn launch(&self, link: WatchdogLink) -> LauncherResult<()>;
}

/// Re-executes the current binary in daemon mode.
pub struct DaemonWatchdog {
    server_dir: PathBuf,
}

impl DaemonWatchdog {
    pub fn new(server_dir: &Path) -> Self {
        Self {
            server_dir: server_dir.to_path_buf(),
        }
    }

    /// Arguments the daemon is started with.
    pub fn arguments(&self, link: WatchdogLink) -> Vec<String> {
        vec![
            "--daemon".to_string(),
            "--path".to_string(),
            self.server_dir.display().to_string(),
            "--launcherpid".to_string(),
            link.launcher_pid.to_string(),
            "--consolepid".to_string(),
            link.console_pid.to_string(),
        ]
    }
}

impl WatchdogLauncher for DaemonWatchdog {
    fn launch(&self, link: WatchdogLink) -> LauncherResult<()> {
        let exe = std::env::current_exe().map_err(LauncherError::watchdog_spawn)?;

        let mut cmd = Command::new(exe);
        cmd.args(self.arguments(link))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        process::detach(&mut cmd);

        let child = cmd.spawn().map_err(LauncherError::watchdog_spawn)?;
        info!("Watchdog started (PID {})", child.id());
        Ok(())
    }
}
