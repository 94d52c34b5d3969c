//! Fan-out Runner (spec §4.8): broadcasts one command to every active
//! session's own new window, in sequence.

use std::path::Path;

use tracing::warn;

use swarm_core::{Error, Result};

use crate::deps::SwarmDeps;
use crate::repo_identity::RepoIdentity;

/// One session's fan-out result, returned so callers can render the
/// `=== <session> ===` + captured-output block themselves.
pub struct FanoutResult {
    pub session_name: String,
    pub captured: String,
}

/// Run `command` in a fresh window of every active session for `repo`,
/// in sequence (spec §4.8). Per-session failures log and are skipped;
/// only a wholly empty active set fails `NoSessions`.
pub async fn fan_out(deps: &SwarmDeps, repo: &Path, command: &str, delete: bool) -> Result<Vec<FanoutResult>> {
    let identity = RepoIdentity::resolve(deps.scm.as_ref(), repo)?;
    let active = deps.store.list_active_for_repo(&identity.prefix())?;

    if active.is_empty() {
        return Err(Error::NoSessions);
    }

    let mut results = Vec::with_capacity(active.len());
    for session_name in active {
        match run_one(deps, &session_name, command, delete) {
            Ok(captured) => results.push(FanoutResult { session_name, captured }),
            Err(e) => warn!(event = "engine.fanout.session_failed", session_name = %session_name, error = %e),
        }
    }

    Ok(results)
}

fn run_one(deps: &SwarmDeps, session_name: &str, command: &str, delete: bool) -> Result<String> {
    let idx = deps.term.new_window_get_index(session_name).map_err(Error::from)?;
    let target = format!("{session_name}:{idx}");
    deps.term.send_keys(&target, command, true).map_err(Error::from)?;
    let captured = deps.term.capture_pane(&target).map_err(Error::from)?;
    if delete {
        deps.term.kill_window(&target).map_err(Error::from)?;
    }
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Utc;
    use swarm_core::{RandomNameSource, SessionDescriptor};
    use swarm_paths::SwarmPaths;
    use swarm_scm::FakeScmDriver;
    use swarm_store::StateStore;
    use swarm_term::FakeTerminalDriver;
    use tempfile::TempDir;

    fn seeded_deps(dir: &TempDir) -> SwarmDeps {
        let paths = Arc::new(SwarmPaths::from_dir(dir.path().to_path_buf()));
        let term: Arc<dyn swarm_term::TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let scm = FakeScmDriver::new();
        let repo = Path::new("/repo");
        scm.set_short_hash(repo, "abc1234");
        scm.set_remote_url(repo, "git@github.com:example/myproj.git");

        let session_name = "agent-myproj-abc1234-newt";
        term.new_session(session_name, Path::new("/tmp")).expect("seed session");

        let store = Arc::new(StateStore::new(&paths, term.clone()));
        store
            .save(SessionDescriptor::new(
                "hi", "branch", session_name, "/tmp/wt", None, "claude", Utc::now().to_rfc3339(),
            ))
            .expect("save");

        SwarmDeps { term, scm: Arc::new(scm), store, paths, names: Arc::new(RandomNameSource) }
    }

    #[tokio::test]
    async fn fan_out_prints_captured_output_per_session() {
        let dir = TempDir::new().expect("tempdir");
        let deps = seeded_deps(&dir);

        let results = fan_out(&deps, Path::new("/repo"), "git status", false).await.expect("fan out");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].session_name, "agent-myproj-abc1234-newt");
    }

    #[tokio::test]
    async fn fan_out_with_no_active_sessions_fails_no_sessions() {
        let dir = TempDir::new().expect("tempdir");
        let paths = Arc::new(SwarmPaths::from_dir(dir.path().to_path_buf()));
        let term: Arc<dyn swarm_term::TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = Arc::new(StateStore::new(&paths, term.clone()));
        let deps = SwarmDeps {
            term,
            scm: Arc::new(FakeScmDriver::new()),
            store,
            paths,
            names: Arc::new(RandomNameSource),
        };

        let err = fan_out(&deps, Path::new("/repo"), "git status", false).await.unwrap_err();
        assert!(matches!(err, Error::NoSessions));
    }
}
