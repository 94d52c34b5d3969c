//! Centralized path construction for swarm's user-data directory.
//!
//! Single source of truth for where the state file and worktrees root
//! live, so the state store, spawn orchestrator, and activity monitor
//! never disagree about on-disk layout.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("could not determine a user data directory — set $HOME")]
    DataDirNotFound,
}

/// Resolves every path swarm reads or writes under its user-data root.
#[derive(Debug, Clone)]
pub struct SwarmPaths {
    root: PathBuf,
}

impl SwarmPaths {
    /// Resolve from the platform's data directory (`dirs::data_dir()/swarm`),
    /// falling back to `~/.swarm` when no platform data dir is reported.
    pub fn resolve() -> Result<Self, PathError> {
        let root = dirs::data_dir()
            .map(|d| d.join("swarm"))
            .or_else(|| dirs::home_dir().map(|h| h.join(".swarm")))
            .ok_or(PathError::DataDirNotFound)?;
        Ok(Self { root })
    }

    /// Build paths rooted at an explicit directory. Use in tests.
    pub fn from_dir(root: PathBuf) -> Self {
        Self { root }
    }

    /// The base user-data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the single state-store file (§6).
    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// The worktrees parent directory, created by the spawn path (§4.5 step 4).
    pub fn worktrees_dir(&self) -> PathBuf {
        self.root.join("worktrees")
    }

    /// Path for one worktree by its computed name.
    pub fn worktree_path(&self, worktree_name: &str) -> PathBuf {
        self.worktrees_dir().join(worktree_name)
    }
}
