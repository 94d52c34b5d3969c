//! Watcher (spec §4.7): a 1 s reconcile loop that keeps one observer
//! task alive per active session, plus the observer logic itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use swarm_core::SessionMonitorState;
use swarm_term::TerminalDriver;

use crate::deps::SwarmDeps;
use crate::repo_identity::RepoIdentity;

const RECONCILE_INTERVAL: Duration = Duration::from_secs(1);
const OBSERVER_INTERVAL: Duration = Duration::from_millis(500);

/// Case-sensitive substrings that mark a pane waiting on operator input
/// (spec §4.7, §6 "part of the behavioral contract").
const PROMPT_SIGNATURES: [&str; 6] = [
    "Do you trust the files in this folder?",
    "Press Enter to continue",
    "Continue? (Y/n)",
    "Do you want to proceed?",
    "Do you want to",
    "Proceed? (y/N)",
];

struct Entry {
    state: Arc<Mutex<SessionMonitorState>>,
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the reconcile ticker and the live map of per-session observers.
pub struct Watcher {
    deps: SwarmDeps,
    repo: std::path::PathBuf,
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Watcher {
    pub fn new(deps: SwarmDeps, repo: std::path::PathBuf) -> Self {
        Self { deps, repo, sessions: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Run the reconcile loop until `quit` fires (spec §4.7 "Shutdown").
    /// When it returns, every observer has already been told to stop.
    pub async fn run(&self, quit: CancellationToken) {
        let mut interval = tokio::time::interval(RECONCILE_INTERVAL);
        loop {
            tokio::select! {
                _ = interval.tick() => self.reconcile(&quit).await,
                _ = quit.cancelled() => {
                    self.stop_all();
                    debug!(event = "engine.watcher.quit");
                    return;
                }
            }
        }
    }

    async fn reconcile(&self, quit: &CancellationToken) {
        let identity = match RepoIdentity::resolve(self.deps.scm.as_ref(), &self.repo) {
            Ok(id) => id,
            Err(e) => {
                warn!(event = "engine.watcher.repo_identity_failed", error = %e);
                return;
            }
        };
        let active = match self.deps.store.list_active_for_repo(&identity.prefix()) {
            Ok(active) => active,
            Err(e) => {
                warn!(event = "engine.watcher.list_active_failed", error = %e);
                return;
            }
        };
        let active_set: std::collections::HashSet<String> = active.into_iter().collect();

        let mut sessions = self.sessions.lock();

        sessions.retain(|name, entry| {
            if active_set.contains(name) {
                true
            } else {
                entry.stop.cancel();
                entry.handle.abort();
                debug!(event = "engine.watcher.observer_removed", session_name = %name);
                false
            }
        });

        for session_name in &active_set {
            if sessions.contains_key(session_name) {
                continue;
            }
            let stop = CancellationToken::new();
            let state = Arc::new(Mutex::new(SessionMonitorState::new(Utc::now())));
            let handle = spawn_observer(
                self.deps.term.clone(),
                session_name.clone(),
                stop.clone(),
                quit.clone(),
                state.clone(),
            );
            sessions.insert(session_name.clone(), Entry { state, stop, handle });
            debug!(event = "engine.watcher.observer_added", session_name = %session_name);
        }
    }

    fn stop_all(&self) {
        let mut sessions = self.sessions.lock();
        for (_, entry) in sessions.drain() {
            entry.stop.cancel();
        }
    }

    /// Test/inspection hook: current observer counters, keyed by session.
    pub fn observer_states(&self) -> HashMap<String, SessionMonitorState> {
        self.sessions
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.state.lock().clone()))
            .collect()
    }
}

fn spawn_observer(
    term: Arc<dyn TerminalDriver>,
    session_name: String,
    stop: CancellationToken,
    quit: CancellationToken,
    state: Arc<Mutex<SessionMonitorState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(OBSERVER_INTERVAL);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut guard = state.lock();
                    if observe_once(&term, &session_name, &mut guard).await {
                        return;
                    }
                }
                _ = stop.cancelled() => {
                    debug!(event = "engine.watcher.observer_stopped", session_name = %session_name);
                    return;
                }
                _ = quit.cancelled() => {
                    debug!(event = "engine.watcher.observer_quit", session_name = %session_name);
                    return;
                }
            }
        }
    })
}

/// Run one observer tick. Returns `true` when the observer should
/// self-terminate (session gone).
async fn observe_once(term: &Arc<dyn TerminalDriver>, session_name: &str, state: &mut SessionMonitorState) -> bool {
    let target = format!("{session_name}:agent");

    if !term.has_session(&target) {
        debug!(event = "engine.watcher.session_gone", session_name = %session_name);
        return true;
    }

    let content = match term.capture_pane(&target) {
        Ok(content) => content,
        Err(e) => {
            if swarm_term::is_session_gone(&e.to_string()) {
                debug!(event = "engine.watcher.capture_session_gone", session_name = %session_name);
                return true;
            }
            warn!(event = "engine.watcher.capture_failed", session_name = %session_name, error = %e);
            return false;
        }
    };

    let needs_enter = PROMPT_SIGNATURES.iter().any(|sig| content.contains(sig));

    let digest = hex::encode(Sha256::digest(content.as_bytes()));
    state.observe(digest, Utc::now());

    if needs_enter {
        if let Err(e) = term.send_keys(&target, "Enter", false) {
            warn!(event = "engine.watcher.send_enter_failed", session_name = %session_name, error = %e);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use swarm_term::FakeTerminalDriver;

    #[tokio::test]
    async fn observer_self_terminates_when_session_is_gone() {
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let mut state = SessionMonitorState::new(Utc::now());
        let terminated = observe_once(&term, "agent-proj-abc-newt", &mut state).await;
        assert!(terminated);
    }

    #[tokio::test]
    async fn observer_detects_prompt_signature_and_sends_bare_enter() {
        let fake = FakeTerminalDriver::new();
        fake.new_session("agent-proj-abc-newt", Path::new("/tmp")).expect("seed");
        fake.rename_window("agent-proj-abc-newt:0", "agent").expect("rename");
        fake.set_pane_contents("agent-proj-abc-newt", "agent", "Do you want to proceed?");
        let term: Arc<dyn TerminalDriver> = Arc::new(fake);

        let mut state = SessionMonitorState::new(Utc::now());
        let terminated = observe_once(&term, "agent-proj-abc-newt", &mut state).await;

        assert!(!terminated);
        assert_eq!(state.update_count, 1);
    }

    #[tokio::test]
    async fn unchanged_pane_content_increments_no_update_count() {
        let fake = FakeTerminalDriver::new();
        fake.new_session("agent-proj-abc-newt", Path::new("/tmp")).expect("seed");
        fake.rename_window("agent-proj-abc-newt:0", "agent").expect("rename");
        let term: Arc<dyn TerminalDriver> = Arc::new(fake);

        let mut state = SessionMonitorState::new(Utc::now());
        observe_once(&term, "agent-proj-abc-newt", &mut state).await;
        observe_once(&term, "agent-proj-abc-newt", &mut state).await;

        assert_eq!(state.update_count, 1);
        assert_eq!(state.no_update_count, 1);
    }
}
