use crate::supervisor::{ServerProcess, SupervisedProcess};

/// Stops the server when the launcher leaves the supervising scope,
/// whether it returns normally, errors out or is cancelled by a signal.
pub struct ServerGuard<P: SupervisedProcess = ServerProcess> {
    process: P,
    released: bool,
}

impl<P: SupervisedProcess> ServerGuard<P> {
    pub fn new(process: P) -> Self {
        Self {
            process,
            released: false,
        }
    }

    pub fn process_mut(&mut self) -> &mut P {
        &mut self.process
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    /// Stop the server without blocking the runtime. Later calls and the
    /// drop are no-ops.
    pub async fn shutdown(&mut self, reason: &str) {
        if self.released {
            return;
        }
        self.released = true;
        self.process.stop(reason).await;
    }

    /// Stop the server now, blocking until it exits. Later calls and the
    /// drop are no-ops.
    pub fn release(&mut self, reason: &str) {
        if self.released {
            return;
        }
        self.released = true;
        self.process.terminate(reason);
    }
}

impl<P: SupervisedProcess> Drop for ServerGuard<P> {
    fn drop(&mut self) {
        self.release("launcher is shutting down");
    }
}
