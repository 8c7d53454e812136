use dashmap::DashMap;
use std::fmt;
use std::sync::OnceLock;
use tokio::sync::Mutex;
use wordle_core::{Dictionary, Session};

use crate::config::ServerConfig;

pub mod lifecycle;
pub mod sessions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Initializing,
    Loading,
    Sorting,
    Cleaning,
    Ready,
}

impl RegistryState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Loading => "LOADING",
            Self::Sorting => "SORTING",
            Self::Cleaning => "CLEANING",
            Self::Ready => "READY",
        }
    }

    /// Games can be served once the dictionary is in; a cleanup pass does
    /// not interrupt that.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready | Self::Cleaning)
    }
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide wordle state: the dictionary, the live sessions, and the
/// state machine the lifecycle task drives.
pub struct Registry {
    config: ServerConfig,
    state: Mutex<RegistryState>,
    dictionary: OnceLock<Dictionary>,
    sessions: DashMap<String, Session>,
}

impl Registry {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::Initializing),
            dictionary: OnceLock::new(),
            sessions: DashMap::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn state(&self) -> RegistryState {
        *self.state.lock().await
    }

    pub async fn is_ready(&self) -> bool {
        self.state().await.is_ready()
    }

    async fn set_state(&self, next: RegistryState) {
        let mut state = self.state.lock().await;
        *state = next;
        tracing::info!(state = %next, "~~~~ Registry state ~~~~");
    }

    /// Moves `from -> to` and returns true, or leaves the state alone if it
    /// is not `from`.
    async fn transition(&self, from: RegistryState, to: RegistryState) -> bool {
        let mut state = self.state.lock().await;
        if *state != from {
            return false;
        }
        *state = to;
        tracing::info!(state = %to, "~~~~ Registry state ~~~~");
        true
    }

    /// The loaded dictionary; set once and never modified afterwards.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dictionary.get()
    }

    pub fn is_word_valid(&self, word: &str) -> bool {
        self.dictionary()
            .is_some_and(|dictionary| dictionary.is_valid_guess(word))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
