use dashmap::mapref::entry::Entry;
use shared::Answer;
use std::sync::Arc;
use wordle_core::{session::new_session_id, Session};

use crate::error::CommandError;
use crate::registry::Registry;

impl Registry {
    /// Starts a game for `name` against a random secret and returns its id.
    pub fn new_session(&self, name: &str) -> Result<String, CommandError> {
        self.create_session(name, new_session_id)
    }

    pub(crate) fn create_session(
        &self,
        name: &str,
        mut next_id: impl FnMut() -> String,
    ) -> Result<String, CommandError> {
        let secret = self
            .dictionary()
            .and_then(|dictionary| dictionary.pick(&mut rand::thread_rng()))
            .ok_or(CommandError::NotReady)?;

        for attempt in 1..=self.config().session_id_retries {
            match self.sessions.entry(next_id()) {
                Entry::Occupied(entry) => {
                    tracing::warn!(session_id = %entry.key(), attempt, "Session id collision, retrying");
                }
                Entry::Vacant(entry) => {
                    let id = entry.key().clone();
                    entry.insert(Session::with_id(id.clone(), name, Arc::clone(&secret)));
                    tracing::info!(session_id = %id, name = %name, "Session created");
                    return Ok(id);
                }
            }
        }

        tracing::warn!(name = %name, "Gave up drawing a free session id");
        Err(CommandError::Capacity)
    }

    pub fn close_session(&self, sid: &str) -> bool {
        let closed = self.sessions.remove(sid).is_some();
        if closed {
            tracing::info!(session_id = %sid, "Session closed");
        }
        closed
    }

    /// Runs `f` on a touched session while holding its entry, so a cleanup
    /// pass cannot evict it halfway through.
    pub fn with_session<R>(
        &self,
        sid: &str,
        f: impl FnOnce(&mut Session) -> Result<R, CommandError>,
    ) -> Result<R, CommandError> {
        let mut session = self
            .sessions
            .get_mut(sid)
            .ok_or(CommandError::InvalidSession)?;
        session.touch();
        f(session.value_mut())
    }

    /// Drops every session.
    pub fn reset(&self) {
        let count = self.sessions.len();
        self.sessions.clear();
        tracing::warn!(removed = count, "All sessions reset");
    }

    /// Global stats: registry state plus one summary per session, by name.
    pub async fn stats(&self) -> Answer {
        let state = self.state().await;
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(Session::cmp_by_name);
        Answer::stats(
            state.as_str(),
            sessions.iter().map(Session::summary).collect(),
        )
    }
}
