//! `ScmDriver` — the capability the spawn orchestrator, activity monitor,
//! and grafter drive git worktrees through (spec §4.3).
//!
//! Production binds this to [`git::GitDriver`]; tests bind it to
//! [`fake::FakeScmDriver`].

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;

use crate::errors::Result;

/// Result of `git diff --shortstat` run against the staged tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStat {
    pub insertions: u64,
    pub deletions: u64,
    pub files_changed: u64,
}

/// Result of `log_since`: how many commits landed in the window, and the
/// timestamp of the most recent one (`None` when the window is empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSince {
    pub commit_count: u64,
    pub last_commit_at: Option<DateTime<Utc>>,
}

pub trait ScmDriver: Send + Sync {
    /// Short commit hash of `repo`'s current `HEAD`.
    fn short_hash(&self, repo: &Path) -> Result<String>;

    /// URL of `repo`'s `origin` remote, or `None` if no `origin` remote
    /// is configured (spec §4.3a: "tolerating a missing remote").
    fn remote_url(&self, repo: &Path) -> Result<Option<String>>;

    /// Add a worktree at `path` on a new branch `branch`.
    fn worktree_add(&self, repo: &Path, branch: &str, path: &Path) -> Result<()>;

    /// Remove a previously-added worktree.
    fn worktree_remove(&self, repo: &Path, path: &Path) -> Result<()>;

    /// Commits reachable from `HEAD` in `path` with a commit time within
    /// `since` of now, plus the most recent commit's timestamp.
    fn log_since(&self, path: &Path, since: Duration) -> Result<LogSince>;

    /// Working-tree diff stats, including untracked files (spec §4.3:
    /// "implemented as stage-all / diff-cached / reset").
    fn diff_shortstat(&self, path: &Path) -> Result<DiffStat>;

    /// Rebase `path`'s current branch onto `branch`.
    fn rebase(&self, path: &Path, branch: &str) -> Result<()>;

    /// Stage everything and commit with `message`.
    fn commit(&self, path: &Path, message: &str) -> Result<()>;

    /// Discard all working-tree and index changes in `path`.
    fn reset_hard(&self, path: &Path) -> Result<()>;
}
