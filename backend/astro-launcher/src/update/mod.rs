//! Launcher self-update.

mod coordinator;
mod helper;

pub use coordinator::{AutoUpdateTarget, UpdateCoordinator, UpdateDescriptor, UpdateOutcome};
pub use helper::{HelperShell, UpdateHelper};
