use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub dictionary_path: PathBuf,

    // Lifecycle timer
    pub startup_delay_ms: u64,
    pub cleanup_interval_secs: u64,

    /// Attempts at drawing an unused session id before giving up.
    pub session_id_retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            dictionary_path: PathBuf::from("assets/wordle.csv"),
            startup_delay_ms: 10,
            cleanup_interval_secs: 60,
            session_id_retries: 5,
        }
    }
}

impl ServerConfig {
    /// Overlays a (possibly partial) json document on the defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}
