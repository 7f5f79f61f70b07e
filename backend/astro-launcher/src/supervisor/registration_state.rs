use tokio::sync::watch;
use tracing::{debug, warn};

/// Where the launcher is in its startup sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    NotStarted,
    /// Cleaning up stale sessions and launching the server
    Starting,
    /// Server process is running, waiting for it to appear in the directory
    AwaitingRegistration,
    /// Server is listed in the directory
    Registered { lobby_id: String },
    /// Startup failed; terminal
    Failed { reason: String },
}

impl RegistrationState {
    fn rank(&self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Starting => 1,
            Self::AwaitingRegistration => 2,
            Self::Registered { .. } => 3,
            Self::Failed { .. } => 4,
        }
    }

    /// Forward-only: any state may fail, nothing leaves `Failed`,
    /// and no state is re-entered.
    pub fn can_transition_to(&self, next: &RegistrationState) -> bool {
        match (self, next) {
            (Self::Failed { .. }, _) => false,
            (_, Self::Failed { .. }) => true,
            _ => next.rank() > self.rank(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Owns the current [`RegistrationState`] and publishes changes.
pub struct RegistrationTracker {
    state_tx: watch::Sender<RegistrationState>,
    state_rx: watch::Receiver<RegistrationState>,
}

impl RegistrationTracker {
    pub fn new() -> Self {
        let (state_tx, state_rx) = watch::channel(RegistrationState::NotStarted);
        Self { state_tx, state_rx }
    }

    /// Move to `next` if the transition is allowed. Returns whether it was.
    pub fn advance(&self, next: RegistrationState) -> bool {
        let current = self.current();
        if !current.can_transition_to(&next) {
            warn!("Ignoring registration state change {current:?} -> {next:?}");
            return false;
        }

        debug!("Registration state {current:?} -> {next:?}");
        self.state_tx.send_replace(next);
        true
    }

    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.advance(RegistrationState::Failed {
            reason: reason.into(),
        })
    }

    pub fn current(&self) -> RegistrationState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.state_rx.clone()
    }
}

impl Default for RegistrationTracker {
    fn default() -> Self {
        Self::new()
    }
}
