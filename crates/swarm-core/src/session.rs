//! `SessionDescriptor` — the durable record of one running agent (spec §3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One running agent: its prompt, branch, worktree, port, and model.
///
/// Serialized with the field names fixed by spec §6's wire format
/// (`camelCase` for the multi-word fields). Unknown fields round-trip
/// through `extra` so forward compatibility holds even though this
/// struct doesn't enumerate every field a future version might add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub prompt: String,
    #[serde(rename = "branchName")]
    pub branch_name: String,
    #[serde(rename = "sessionName")]
    pub session_name: String,
    #[serde(rename = "worktreePath")]
    pub worktree_path: String,
    pub port: Option<u16>,
    pub model: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,

    /// Fields present on disk that this version doesn't know about.
    /// Preserved verbatim on re-serialization (spec §4.1 "unknown
    /// fields on read are preserved on write").
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SessionDescriptor {
    pub fn new(
        prompt: impl Into<String>,
        branch_name: impl Into<String>,
        session_name: impl Into<String>,
        worktree_path: impl Into<String>,
        port: Option<u16>,
        model: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            branch_name: branch_name.into(),
            session_name: session_name.into(),
            worktree_path: worktree_path.into(),
            port,
            model: model.into(),
            updated_at: updated_at.into(),
            extra: BTreeMap::new(),
        }
    }

    /// The project + short-hash prefix encoded in `session_name`
    /// (`agent-<project>-<hash>-`), used by active-for-repo filtering
    /// (spec §3 invariant 2, §6 repo partitioning).
    pub fn repo_prefix(&self) -> Option<&str> {
        let rest = self.session_name.strip_prefix("agent-")?;
        let dash_count = rest.matches('-').count();
        if dash_count < 2 {
            return None;
        }
        // prefix is "agent-<project>-<hash>-"; project may itself contain
        // dashes, so we only need the name up through the hash segment's
        // trailing dash, which is the nth-from-last dash after the display
        // name. Since display names never contain dashes, the last dash in
        // session_name separates hash from display name.
        let last_dash = self.session_name.rfind('-')?;
        Some(&self.session_name[..=last_dash])
    }

    /// The agent display name, the text after the final dash in
    /// `session_name` (`agent-<project>-<hash>-<display>`).
    pub fn display_name(&self) -> Option<&str> {
        self.session_name.rsplit('-').next()
    }
}
