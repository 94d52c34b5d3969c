//! Recording fake `ScmDriver` for deterministic tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::{DiffStat, LogSince, ScmDriver};
use crate::errors::{Result, ScmError};

#[derive(Debug, Clone, PartialEq)]
pub enum ScmCall {
    WorktreeAdd { branch: String, path: PathBuf },
    WorktreeRemove { path: PathBuf },
    Rebase { path: PathBuf, branch: String },
    Commit { path: PathBuf, message: String },
    ResetHard { path: PathBuf },
}

/// In-memory stand-in for `GitDriver`. Every repo is pre-seeded with a
/// short hash and remote URL; worktree/diff/log state is programmable
/// per path so tests can script activity-monitor scenarios.
#[derive(Default)]
pub struct FakeScmDriver {
    pub short_hashes: Mutex<HashMap<PathBuf, String>>,
    pub remote_urls: Mutex<HashMap<PathBuf, String>>,
    pub log_results: Mutex<HashMap<PathBuf, LogSince>>,
    pub diff_results: Mutex<HashMap<PathBuf, DiffStat>>,
    pub worktrees: Mutex<Vec<PathBuf>>,
    pub calls: Mutex<Vec<ScmCall>>,
    pub fail_worktree_add: Mutex<bool>,
}

impl FakeScmDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_short_hash(&self, repo: &Path, hash: &str) {
        self.short_hashes.lock().insert(repo.to_path_buf(), hash.to_string());
    }

    pub fn set_remote_url(&self, repo: &Path, url: &str) {
        self.remote_urls.lock().insert(repo.to_path_buf(), url.to_string());
    }

    pub fn set_log_since(&self, path: &Path, result: LogSince) {
        self.log_results.lock().insert(path.to_path_buf(), result);
    }

    pub fn set_diff_shortstat(&self, path: &Path, result: DiffStat) {
        self.diff_results.lock().insert(path.to_path_buf(), result);
    }
}

impl ScmDriver for FakeScmDriver {
    fn short_hash(&self, repo: &Path) -> Result<String> {
        Ok(self
            .short_hashes
            .lock()
            .get(repo)
            .cloned()
            .unwrap_or_else(|| "abc1234".to_string()))
    }

    fn remote_url(&self, repo: &Path) -> Result<Option<String>> {
        Ok(Some(
            self.remote_urls
                .lock()
                .get(repo)
                .cloned()
                .unwrap_or_else(|| "git@github.com:example/repo.git".to_string()),
        ))
    }

    fn worktree_add(&self, _repo: &Path, branch: &str, path: &Path) -> Result<()> {
        if *self.fail_worktree_add.lock() {
            return Err(ScmError::Failed { stderr: "fake worktree_add failure".to_string() });
        }
        self.calls.lock().push(ScmCall::WorktreeAdd {
            branch: branch.to_string(),
            path: path.to_path_buf(),
        });
        self.worktrees.lock().push(path.to_path_buf());
        Ok(())
    }

    fn worktree_remove(&self, _repo: &Path, path: &Path) -> Result<()> {
        self.calls.lock().push(ScmCall::WorktreeRemove { path: path.to_path_buf() });
        self.worktrees.lock().retain(|p| p != path);
        Ok(())
    }

    fn log_since(&self, path: &Path, _since: Duration) -> Result<LogSince> {
        Ok(self.log_results.lock().get(path).cloned().unwrap_or_default())
    }

    fn diff_shortstat(&self, path: &Path) -> Result<DiffStat> {
        Ok(self.diff_results.lock().get(path).copied().unwrap_or_default())
    }

    fn rebase(&self, path: &Path, branch: &str) -> Result<()> {
        self.calls.lock().push(ScmCall::Rebase {
            path: path.to_path_buf(),
            branch: branch.to_string(),
        });
        Ok(())
    }

    fn commit(&self, path: &Path, message: &str) -> Result<()> {
        self.calls.lock().push(ScmCall::Commit {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn reset_hard(&self, path: &Path) -> Result<()> {
        self.calls.lock().push(ScmCall::ResetHard { path: path.to_path_buf() });
        Ok(())
    }
}
