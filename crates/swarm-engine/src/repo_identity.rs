//! Derives the `agent-<project>-<short-hash>-` prefix that partitions
//! the store logically by repo (spec §4.5 step 2, §6 repo partitioning).

use std::path::Path;

use swarm_scm::{project_name_from_remote, ScmDriver};

/// `project` + `short_hash` for `repo`, as used to build both
/// `session_name`/`branch_name` at spawn time and the active-for-repo
/// filter prefix everywhere else.
pub struct RepoIdentity {
    pub project: String,
    pub short_hash: String,
}

impl RepoIdentity {
    pub fn resolve(scm: &dyn ScmDriver, repo: &Path) -> swarm_core::Result<Self> {
        let short_hash = scm.short_hash(repo).map_err(swarm_core::Error::from)?;
        let remote_url = scm.remote_url(repo).map_err(swarm_core::Error::from)?;
        let project = match remote_url {
            Some(url) => project_name_from_remote(&url),
            // No `origin` configured: fall back to the working directory's
            // own name, same idea the word-list-adjacent naming helpers in
            // the wider ecosystem use for a repo with no remote.
            None => repo
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
        };
        Ok(Self { project, short_hash })
    }

    /// `agent-<project>-<short-hash>-`, the prefix every `session_name`
    /// in this repo's partition begins with.
    pub fn prefix(&self) -> String {
        format!("agent-{}-{}-", self.project, self.short_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_scm::FakeScmDriver;

    #[test]
    fn prefix_combines_project_and_hash() {
        let scm = FakeScmDriver::new();
        let repo = Path::new("/repo");
        scm.set_short_hash(repo, "abc1234");
        scm.set_remote_url(repo, "git@github.com:example/myproj.git");
        let identity = RepoIdentity::resolve(&scm, repo).expect("resolve");
        assert_eq!(identity.prefix(), "agent-myproj-abc1234-");
    }
}
