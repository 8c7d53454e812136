use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use wordle_core::Dictionary;

use crate::registry::{Registry, RegistryState};

impl Registry {
    /// Spawns the timer that loads the dictionary shortly after startup and
    /// then evicts orphaned sessions every cleanup interval. Abort the
    /// returned handle to stop it.
    pub fn spawn_lifecycle_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + self.config().startup_delay();
            let mut interval = tokio::time::interval_at(start, self.config().cleanup_interval());
            loop {
                interval.tick().await;
                self.step().await;
            }
        })
    }

    /// One timer tick: load when initializing, clean up when ready.
    pub async fn step(&self) {
        match self.state().await {
            RegistryState::Initializing => self.initialize().await,
            RegistryState::Ready => {
                self.cleanup(Instant::now()).await;
            }
            RegistryState::Loading | RegistryState::Sorting | RegistryState::Cleaning => {}
        }
    }

    /// LOADING then SORTING then READY. A missing file or an empty
    /// dictionary sends the registry back to INITIALIZING for the next tick.
    pub async fn initialize(&self) {
        if !self
            .transition(RegistryState::Initializing, RegistryState::Loading)
            .await
        {
            return;
        }

        let path = self.config().dictionary_path.clone();
        tracing::info!(path = %path.display(), "Loading wordle database");
        let source = path.clone();
        let loaded = tokio::task::spawn_blocking(move || {
            File::open(&source).map(|file| Dictionary::parse(BufReader::new(file)))
        })
        .await;
        let mut dictionary = match loaded {
            Ok(Ok(dictionary)) => dictionary,
            Ok(Err(e)) => {
                tracing::error!(path = %path.display(), error = %e, "Cannot read wordle database");
                self.set_state(RegistryState::Initializing).await;
                return;
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Wordle database loader failed");
                self.set_state(RegistryState::Initializing).await;
                return;
            }
        };

        if dictionary.is_empty() {
            tracing::error!(path = %path.display(), "Wordle database has no words");
            self.set_state(RegistryState::Initializing).await;
            return;
        }

        self.set_state(RegistryState::Sorting).await;
        dictionary.sort();
        let (count, word_len) = (dictionary.len(), dictionary.word_len());
        if self.dictionary.set(dictionary).is_err() {
            tracing::warn!("Wordle database already loaded, keeping the first one");
        }
        tracing::info!(words = count, word_len, "Wordle database ready");
        self.set_state(RegistryState::Ready).await;
    }

    /// READY then CLEANING then READY, evicting every session idle for the
    /// orphan threshold as of `now`. Returns the number removed.
    pub async fn cleanup(&self, now: Instant) -> usize {
        if !self
            .transition(RegistryState::Ready, RegistryState::Cleaning)
            .await
        {
            return 0;
        }

        let orphans = self.orphan_ids(now);
        let removed = self.evict(&orphans, now);

        tracing::info!(
            removed,
            remaining = self.sessions.len(),
            "Sessions cleaned up"
        );
        self.set_state(RegistryState::Ready).await;
        removed
    }

    /// Ids of the sessions that are orphans as of `now`.
    pub(crate) fn orphan_ids(&self, now: Instant) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().is_orphan(now))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Removes the listed sessions that are still orphans as of `now`; one
    /// touched since `orphan_ids` ran stays.
    pub(crate) fn evict(&self, sids: &[String], now: Instant) -> usize {
        sids.iter()
            .filter(|sid| {
                self.sessions
                    .remove_if(sid.as_str(), |_, session| session.is_orphan(now))
                    .is_some()
            })
            .count()
    }
}
