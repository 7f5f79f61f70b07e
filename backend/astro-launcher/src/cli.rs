use crate::watchdog::WatchdogLink;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "astro-launcher")]
#[command(about = "Launches and supervises an Astroneer dedicated server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server folder (defaults to the current directory)
    #[arg(short = 'p', long = "path")]
    pub path: Option<PathBuf>,

    /// Run as the watchdog daemon
    #[arg(short = 'd', long = "daemon")]
    pub daemon: bool,

    /// Disable automatic updates of the launcher
    #[arg(short = 'U', long = "noupdate")]
    pub no_update: bool,

    /// Server process id (daemon mode)
    #[arg(short = 'c', long = "consolepid")]
    pub console_pid: Option<u32>,

    /// Launcher process id (daemon mode)
    #[arg(short = 'l', long = "launcherpid")]
    pub launcher_pid: Option<u32>,
}

impl Cli {
    pub fn server_dir(&self) -> std::io::Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Both ids, if both were given.
    pub fn watchdog_link(&self) -> Option<WatchdogLink> {
        Some(WatchdogLink {
            launcher_pid: self.launcher_pid?,
            console_pid: self.console_pid?,
        })
    }
}
