//! Per-session activity metrics and the pure working/idle/stuck classifier
//! (spec §3 Metrics, §4.6 classification, §8 boundary behaviors).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Working,
    Idle,
    Stuck,
}

/// Source-control activity for one session, held only in memory by the
/// Activity Monitor (never persisted — spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub commits: u32,
    pub insertions: u32,
    pub deletions: u32,
    pub files_changed: u32,
    /// `None` when no commit has ever been observed ("zero when unknown"
    /// in spec §3 is represented here as `Option::None` rather than a
    /// sentinel timestamp, so classification can't mistake the Unix epoch
    /// for a real commit).
    pub last_commit_at: Option<DateTime<Utc>>,
    pub status: Status,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            commits: 0,
            insertions: 0,
            deletions: 0,
            files_changed: 0,
            last_commit_at: None,
            status: Status::Idle,
        }
    }
}

impl Metrics {
    /// A freshly observed session with no prior metrics (spec §4.6 step 3
    /// "create a zero one on first sight"). Classified immediately.
    pub fn zero(now: DateTime<Utc>) -> Self {
        let mut m = Self::default();
        m.status = classify(&m, now);
        m
    }
}

/// Classify a session's metrics at reference time `now` (spec §4.6).
///
/// Pure function: same inputs always produce the same output, and the
/// ≤1h / ≥2h boundaries are inclusive as specified.
pub fn classify(m: &Metrics, now: DateTime<Utc>) -> Status {
    if m.insertions > 0 || m.deletions > 0 || m.files_changed > 0 {
        return Status::Working;
    }

    match m.last_commit_at {
        Some(last) => {
            let age = now.signed_duration_since(last);
            if age <= chrono::Duration::hours(1) {
                Status::Working
            } else if age >= chrono::Duration::hours(2) {
                Status::Stuck
            } else {
                Status::Idle
            }
        }
        None => Status::Idle,
    }
}
