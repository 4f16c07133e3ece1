//! Tracks which browser sessions are alive via a ping heartbeat, and sweeps
//! out ones that have gone quiet.

use dashmap::DashMap;
use log::*;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Instant>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Allocate a fresh 8 hex-char session id and record its first ping.
    pub fn register(&self) -> String {
        let id = generate_session_id();
        self.sessions.insert(id.clone(), Instant::now());
        id
    }

    /// Record liveness for `session_id`. Returns false if the session is
    /// unknown (e.g. it was already swept).
    pub fn ping(&self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut last) => {
                *last = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn deregister(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Spawn a background sweeper that evicts sessions that haven't pinged
    /// in `ping_period + grace_factor * check_wait`, checking every
    /// `check_wait`. Stops when `cancel` is triggered.
    pub fn spawn_sweeper(
        &self,
        ping_period: Duration,
        check_wait: Duration,
        grace_factor: u32,
        cancel: CancellationToken,
    ) {
        let sessions = Arc::clone(&self.sessions);
        let timeout = ping_period + check_wait * grace_factor;
        tokio::spawn(async move {
            let mut tick = interval(check_wait);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => {
                        let now = Instant::now();
                        sessions.retain(|id, last_ping| {
                            let alive = now.duration_since(*last_ping) <= timeout;
                            if !alive {
                                debug!("evicting stale session {id}");
                            }
                            alive
                        });
                    }
                }
            }
        });
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 4] = rng.gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_produces_8_hex_char_id() {
        let registry = SessionRegistry::new();
        let id = registry.register();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ping_on_unknown_session_returns_false() {
        let registry = SessionRegistry::new();
        assert!(!registry.ping("deadbeef"));
    }

    #[tokio::test]
    async fn sweeper_evicts_sessions_past_grace_window() {
        let registry = SessionRegistry::new();
        let id = registry.register();
        let cancel = CancellationToken::new();
        registry.spawn_sweeper(Duration::from_millis(10), Duration::from_millis(10), 1, cancel.clone());
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
        assert!(!registry.ping(&id));
    }
}
