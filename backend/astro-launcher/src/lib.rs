pub mod cli;
pub mod context;
pub mod error;
pub mod logging;
pub mod network;
pub mod process;
pub mod supervisor;
pub mod update;
pub mod watchdog;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use context::{LauncherContext, VERSION};
pub use error::{LauncherError, Result as LauncherResult};
pub use supervisor::{LaunchOutcome, Launcher, RegistrationState};
pub use watchdog::{Watchdog, WatchdogLink, WatchdogOutcome};
