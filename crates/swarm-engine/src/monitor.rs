//! Activity Monitor (spec §4.6): a 500 ms ticker that keeps a per-session
//! `Metrics` map current by reading the raw state file and querying the
//! SCM driver, then classifies each session as working/idle/stuck.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use swarm_core::{classify, Metrics, SessionDescriptor};

use crate::deps::SwarmDeps;
use crate::repo_identity::RepoIdentity;

const TICK_INTERVAL: Duration = Duration::from_millis(500);
const COMMIT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

pub type MetricsMap = Arc<RwLock<HashMap<String, Metrics>>>;

/// Owns the metrics map and runs the 500 ms ticker (spec §5: "the
/// Activity Monitor has one background ticker task").
pub struct ActivityMonitor {
    deps: SwarmDeps,
    repo: std::path::PathBuf,
    metrics: MetricsMap,
}

impl ActivityMonitor {
    pub fn new(deps: SwarmDeps, repo: std::path::PathBuf) -> Self {
        Self { deps, repo, metrics: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// A deep copy of the per-session metrics map, taken under a single
    /// read-lock acquisition so no reader observes a torn update (spec
    /// §4.6 "Snapshot", §5 ordering guarantees).
    pub fn update_all(&self) -> HashMap<String, Metrics> {
        self.metrics.read().clone()
    }

    /// Run the ticker until `cancel` fires (spec §5: "an external context
    /// cancels the Activity Monitor ticker at the next select").
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = cancel.cancelled() => {
                    debug!(event = "engine.monitor.cancelled");
                    return;
                }
            }
        }
    }

    async fn tick(&self) {
        let identity = match RepoIdentity::resolve(self.deps.scm.as_ref(), &self.repo) {
            Ok(id) => id,
            Err(e) => {
                warn!(event = "engine.monitor.repo_identity_failed", error = %e);
                return;
            }
        };
        let prefix = identity.prefix();

        let active = match self.deps.store.list_active_for_repo(&prefix) {
            Ok(active) => active,
            Err(e) => {
                warn!(event = "engine.monitor.list_active_failed", error = %e);
                return;
            }
        };

        let descriptors = match read_raw_descriptors(self.deps.store.state_path()) {
            Some(d) => d,
            None => {
                debug!(event = "engine.monitor.state_file_absent");
                return;
            }
        };

        let scm = self.deps.scm.clone();
        let active_set: std::collections::HashSet<String> = active.iter().cloned().collect();
        let metrics = self.metrics.clone();

        let result = tokio::task::spawn_blocking(move || {
            let now = Utc::now();
            let mut guard = metrics.write();

            for session_name in &active_set {
                let Some(descriptor) = descriptors.get(session_name) else { continue };
                let worktree_path = Path::new(&descriptor.worktree_path);

                let mut m = guard.remove(session_name).unwrap_or_else(|| Metrics::zero(now));

                let log_since = scm.log_since(worktree_path, COMMIT_WINDOW).unwrap_or_else(|e| {
                    warn!(event = "engine.monitor.log_since_failed", session_name = %session_name, error = %e);
                    Default::default()
                });
                let diff = scm.diff_shortstat(worktree_path).unwrap_or_else(|e| {
                    warn!(event = "engine.monitor.diff_shortstat_failed", session_name = %session_name, error = %e);
                    Default::default()
                });

                m.commits = log_since.commit_count as u32;
                m.last_commit_at = log_since.last_commit_at;
                m.insertions = diff.insertions as u32;
                m.deletions = diff.deletions as u32;
                m.files_changed = diff.files_changed as u32;
                m.status = classify(&m, now);

                guard.insert(session_name.clone(), m);
            }

            // Garbage-collect metrics for sessions no longer active (spec §4.6 step 4).
            guard.retain(|name, _| active_set.contains(name));
        })
        .await;

        if let Err(e) = result {
            warn!(event = "engine.monitor.tick_join_failed", error = %e);
        }
    }
}

/// Direct read of the state file, bypassing the store's existence
/// filtering (spec §4.6 step 2: "done by direct file read; if the file
/// is absent, abort the tick without error").
fn read_raw_descriptors(path: &Path) -> Option<BTreeMap<String, SessionDescriptor>> {
    let bytes = std::fs::read(path).ok()?;
    serde_json::from_slice(&bytes).ok()
}
