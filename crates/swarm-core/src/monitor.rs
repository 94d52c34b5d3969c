//! `SessionMonitorState` — the Watcher's per-session change-detection
//! record (spec §3). The concurrency-bearing `stop_signal` lives in
//! `swarm-engine` (where `tokio_util::CancellationToken` is in scope);
//! this type holds only the plain data the watcher needs to detect
//! pane-content changes and decide when to self-terminate.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMonitorState {
    /// SHA-256 digest of the last captured pane contents, hex-encoded.
    pub prev_output_hash: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub update_count: u64,
    pub no_update_count: u64,
}

impl SessionMonitorState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            prev_output_hash: None,
            last_updated: now,
            update_count: 0,
            no_update_count: 0,
        }
    }

    /// Record a freshly captured pane digest, updating counters per
    /// spec §4.7 "change detection".
    pub fn observe(&mut self, digest: String, now: DateTime<Utc>) {
        if self.prev_output_hash.as_deref() != Some(digest.as_str()) {
            self.prev_output_hash = Some(digest);
            self.last_updated = now;
            self.update_count += 1;
            self.no_update_count = 0;
        } else {
            self.no_update_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_always_counts_as_a_change() {
        let now = Utc::now();
        let mut m = SessionMonitorState::new(now);
        m.observe("abc".to_string(), now);
        assert_eq!(m.update_count, 1);
        assert_eq!(m.no_update_count, 0);
        assert_eq!(m.prev_output_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn repeated_identical_digest_increments_no_update_count() {
        let now = Utc::now();
        let mut m = SessionMonitorState::new(now);
        m.observe("abc".to_string(), now);
        m.observe("abc".to_string(), now);
        m.observe("abc".to_string(), now);
        assert_eq!(m.update_count, 1);
        assert_eq!(m.no_update_count, 2);
    }

    #[test]
    fn changed_digest_resets_no_update_count() {
        let now = Utc::now();
        let mut m = SessionMonitorState::new(now);
        m.observe("abc".to_string(), now);
        m.observe("abc".to_string(), now);
        m.observe("def".to_string(), now);
        assert_eq!(m.update_count, 2);
        assert_eq!(m.no_update_count, 0);
    }
}
