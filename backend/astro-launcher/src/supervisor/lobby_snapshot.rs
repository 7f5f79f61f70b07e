use astro_api::Session;

use std::collections::HashSet;

/// Session identifiers listed by the directory at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbySnapshot(HashSet<String>);

impl LobbySnapshot {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        sessions.iter().map(|s| s.lobby_id.clone()).collect()
    }

    /// Identifiers present here but not in `baseline`.
    pub fn added_since<'a>(&'a self, baseline: &LobbySnapshot) -> HashSet<&'a str> {
        self.0
            .iter()
            .filter(|id| !baseline.0.contains(*id))
            .map(String::as_str)
            .collect()
    }

    pub fn contains(&self, lobby_id: &str) -> bool {
        self.0.contains(lobby_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for LobbySnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
