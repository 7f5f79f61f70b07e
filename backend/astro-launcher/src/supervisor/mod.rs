mod backoff;
mod lifecycle;
mod lobby_snapshot;
mod registration;
mod registration_state;
mod server_guard;
mod server_process;

pub use backoff::BackoffState;
pub use lifecycle::{LaunchOutcome, Launcher, deregister_stale};
pub use lobby_snapshot::LobbySnapshot;
pub use registration::{Registration, RegistrationPoller};
pub use registration_state::{RegistrationState, RegistrationTracker};
pub use server_guard::ServerGuard;
pub use server_process::{ServerProcess, SupervisedProcess};
