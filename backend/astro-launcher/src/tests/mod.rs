mod backoff;
mod error;

use crate::supervisor::SupervisedProcess;

use astro_api::{ApiError, ApiResult, Session, SessionDirectory};
use astro_config::ServerSettings;

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr};
use std::panic::Location;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::time::Instant;

pub(crate) const PUBLIC_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5));
pub(crate) const GAME_PORT: u16 = 7777;
pub(crate) const CONSOLE_PORT: u16 = 1234;

pub(crate) fn test_settings() -> ServerSettings {
    ServerSettings {
        public_ip: PUBLIC_IP,
        port: GAME_PORT,
        console_port: CONSOLE_PORT,
        server_guid: "test-guid".to_string(),
        server_name: Some("Test Base".to_string()),
    }
}

/// A session published by this server.
pub(crate) fn own_session(lobby_id: &str) -> Session {
    session_on(lobby_id, PUBLIC_IP, GAME_PORT)
}

pub(crate) fn session_on(lobby_id: &str, ip: IpAddr, port: u16) -> Session {
    Session {
        lobby_id: lobby_id.to_string(),
        server_ipv4_address: Some(ip.to_string()),
        server_port: Some(port),
        tags: HashMap::new(),
    }
}

/// One scripted answer of [`FakeDirectory::list_sessions`].
#[derive(Debug, Clone)]
pub(crate) enum ListStep {
    Sessions(Vec<Session>),
    Unavailable,
    RateLimited(u64),
}

impl ListStep {
    pub(crate) fn own(ids: &[&str]) -> Self {
        Self::Sessions(ids.iter().map(|id| own_session(id)).collect())
    }

    fn to_result(&self) -> ApiResult<Vec<Session>> {
        match self {
            Self::Sessions(sessions) => Ok(sessions.clone()),
            Self::Unavailable => Err(ApiError::api_error(
                "ServiceUnavailable".to_string(),
                "directory offline".to_string(),
            )),
            Self::RateLimited(secs) => Err(ApiError::RateLimited {
                retry_after_secs: Some(*secs),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Directory answering from a script; the last step repeats forever.
pub(crate) struct FakeDirectory {
    steps: Mutex<VecDeque<ListStep>>,
    last: Mutex<ListStep>,
    pub(crate) list_calls: AtomicU32,
    pub(crate) deregistered: Mutex<Vec<String>>,
    fail_deregister: bool,
}

impl FakeDirectory {
    pub(crate) fn new(steps: Vec<ListStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(ListStep::Sessions(Vec::new())),
            list_calls: AtomicU32::new(0),
            deregistered: Mutex::new(Vec::new()),
            fail_deregister: false,
        }
    }

    pub(crate) fn failing_deregister(mut self) -> Self {
        self.fail_deregister = true;
        self
    }

    pub(crate) fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn deregistered(&self) -> Vec<String> {
        self.deregistered.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionDirectory for FakeDirectory {
    async fn list_sessions(&self, _address: &str) -> ApiResult<Vec<Session>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let mut last = self.last.lock().unwrap();
        if let Some(step) = self.steps.lock().unwrap().pop_front() {
            *last = step;
        }
        last.to_result()
    }

    async fn deregister_session(&self, lobby_id: &str) -> ApiResult<()> {
        self.deregistered.lock().unwrap().push(lobby_id.to_string());
        if self.fail_deregister {
            return Err(ApiError::api_error(
                "NotAuthorized".to_string(),
                "ticket expired".to_string(),
            ));
        }
        Ok(())
    }
}

/// Process that exits on its own after `exit_after` (tokio clock).
pub(crate) struct FakeProcess {
    started: Instant,
    exit_after: Option<Duration>,
    exit_code: Option<i32>,
    exited: bool,
    pub(crate) terminations: Arc<AtomicU32>,
}

impl FakeProcess {
    pub(crate) fn running() -> Self {
        Self {
            started: Instant::now(),
            exit_after: None,
            exit_code: None,
            exited: false,
            terminations: Arc::new(AtomicU32::new(0)),
        }
    }

    pub(crate) fn exiting_after(after: Duration, exit_code: i32) -> Self {
        Self {
            exit_after: Some(after),
            exit_code: Some(exit_code),
            ..Self::running()
        }
    }
}

#[async_trait]
impl SupervisedProcess for FakeProcess {
    fn pid(&self) -> u32 {
        4242
    }

    fn has_exited(&mut self) -> bool {
        if let Some(after) = self.exit_after
            && self.started.elapsed() >= after
        {
            self.exited = true;
        }
        self.exited
    }

    fn exit_code(&self) -> Option<i32> {
        if self.exited { self.exit_code } else { None }
    }

    fn terminate(&mut self, _reason: &str) {
        if self.exited {
            return;
        }
        self.terminations.fetch_add(1, Ordering::SeqCst);
        self.exited = true;
    }

    async fn stop(&mut self, reason: &str) {
        self.terminate(reason);
    }
}
