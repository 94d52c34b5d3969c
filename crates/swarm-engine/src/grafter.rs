//! Grafter (spec §4.9): rebases an agent's branch onto the caller's
//! checkout and folds it into a single consolidating commit.

use std::path::Path;

use swarm_core::{Error, Result};

use crate::deps::SwarmDeps;
use crate::repo_identity::RepoIdentity;

/// Resolve `display_name` to a session in `repo`'s partition, rebase its
/// branch onto the caller's current checkout, and commit with `message`.
/// Any SCM failure aborts immediately (spec §4.9 "Any SCM failure aborts
/// with `ScmFailed`").
pub async fn graft(deps: &SwarmDeps, repo: &Path, display_name: &str, message: &str) -> Result<()> {
    let identity = RepoIdentity::resolve(deps.scm.as_ref(), repo)?;
    let prefix = identity.prefix();

    let mut candidates: Vec<_> = deps
        .store
        .all()?
        .into_iter()
        .filter(|d| d.repo_prefix().as_deref() == Some(prefix.as_str()))
        .filter(|d| d.display_name() == Some(display_name))
        .collect();

    // First match wins, resolved by earliest `updated_at` (DESIGN.md Open
    // Question #2) since the store's map has no other stable ordering.
    candidates.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
    let descriptor = candidates.into_iter().next().ok_or(Error::NoSessions)?;

    deps.scm.rebase(repo, &descriptor.branch_name).map_err(Error::from)?;
    deps.scm.commit(repo, message).map_err(Error::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Utc;
    use swarm_core::{RandomNameSource, SessionDescriptor};
    use swarm_paths::SwarmPaths;
    use swarm_scm::{FakeScmDriver, ScmCall};
    use swarm_store::StateStore;
    use swarm_term::FakeTerminalDriver;
    use tempfile::TempDir;

    fn deps_with(dir: &TempDir, descriptors: Vec<SessionDescriptor>) -> (SwarmDeps, Arc<FakeScmDriver>) {
        let paths = Arc::new(SwarmPaths::from_dir(dir.path().to_path_buf()));
        let term: Arc<dyn swarm_term::TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let scm = Arc::new(FakeScmDriver::new());
        let repo = Path::new("/repo");
        scm.set_short_hash(repo, "abc1234");
        scm.set_remote_url(repo, "git@github.com:example/myproj.git");

        let store = Arc::new(StateStore::new(&paths, term.clone()));
        for d in descriptors {
            store.save(d).expect("save");
        }

        let deps = SwarmDeps {
            term,
            scm: scm.clone() as Arc<dyn swarm_scm::ScmDriver>,
            store,
            paths,
            names: Arc::new(RandomNameSource),
        };
        (deps, scm)
    }

    fn descriptor(session_name: &str, branch: &str, updated_at: chrono::DateTime<Utc>) -> SessionDescriptor {
        SessionDescriptor::new("hi", branch, session_name, "/tmp/wt", None, "claude", updated_at.to_rfc3339())
    }

    #[tokio::test]
    async fn grafts_the_matching_session_rebase_then_commit() {
        let dir = TempDir::new().expect("tempdir");
        let now = Utc::now();
        let (deps, scm) = deps_with(
            &dir,
            vec![descriptor("agent-myproj-abc1234-newt", "newt-branch", now)],
        );

        graft(&deps, Path::new("/repo"), "newt", "consolidate").await.expect("graft");

        let calls = scm.calls.lock();
        assert_eq!(
            *calls,
            vec![
                ScmCall::Rebase { path: Path::new("/repo").to_path_buf(), branch: "newt-branch".to_string() },
                ScmCall::Commit { path: Path::new("/repo").to_path_buf(), message: "consolidate".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn ignores_sessions_from_other_repos_and_other_display_names() {
        let dir = TempDir::new().expect("tempdir");
        let now = Utc::now();
        let (deps, scm) = deps_with(
            &dir,
            vec![
                descriptor("agent-myproj-abc1234-newt", "newt-branch", now),
                descriptor("agent-myproj-abc1234-heron", "heron-branch", now),
                descriptor("agent-otherproj-def456-newt", "other-repo-branch", now),
            ],
        );

        graft(&deps, Path::new("/repo"), "newt", "consolidate").await.expect("graft");

        let calls = scm.calls.lock();
        assert!(calls.iter().any(
            |c| matches!(c, ScmCall::Rebase { branch, .. } if branch == "newt-branch")
        ));
        assert!(!calls.iter().any(
            |c| matches!(c, ScmCall::Rebase { branch, .. } if branch == "heron-branch" || branch == "other-repo-branch")
        ));
    }

    #[tokio::test]
    async fn no_matching_session_fails_no_sessions() {
        let dir = TempDir::new().expect("tempdir");
        let (deps, _scm) = deps_with(&dir, vec![]);
        let err = graft(&deps, Path::new("/repo"), "ghost", "m").await.unwrap_err();
        assert!(matches!(err, Error::NoSessions));
    }
}
