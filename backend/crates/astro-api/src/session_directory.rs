use crate::{ApiResult, Session};

use async_trait::async_trait;

/// The two directory operations the launcher depends on.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Sessions currently listed for a server address (`"<ip>:<port>"`).
    async fn list_sessions(&self, address: &str) -> ApiResult<Vec<Session>>;

    /// Remove a session from the directory.
    async fn deregister_session(&self, lobby_id: &str) -> ApiResult<()>;
}
