//! State Store (spec §4.1): persists session descriptors in a single
//! JSON file, keyed by `session_name`, with atomic writes and
//! terminal-backed existence filtering for `list_active_for_repo`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use swarm_core::{Error, Result, SessionDescriptor};
use swarm_paths::SwarmPaths;
use swarm_term::TerminalDriver;

type Document = BTreeMap<String, SessionDescriptor>;

/// Owns the state file and a handle to the terminal driver needed to
/// confirm a descriptor's session is still alive.
///
/// `write_lock` serializes read-modify-write sequences within one process
/// (spec §5: "concurrent writers within one process are serialized by the
/// store's lock" — cross-process safety comes from the rename itself).
pub struct StateStore {
    path: PathBuf,
    term: Arc<dyn TerminalDriver>,
    write_lock: parking_lot::Mutex<()>,
}

impl StateStore {
    pub fn new(paths: &SwarmPaths, term: Arc<dyn TerminalDriver>) -> Self {
        Self {
            path: paths.state_path(),
            term,
            write_lock: parking_lot::Mutex::new(()),
        }
    }

    /// Absolute path of the state file (needed by the activity monitor
    /// for raw reads, spec §4.1).
    pub fn state_path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(Document::new());
                }
                serde_json::from_slice(&bytes).map_err(|e| Error::StoreIo {
                    path: self.path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(source) => Err(Error::StoreIo { path: self.path.clone(), source }),
        }
    }

    /// Write `document` atomically: serialize to a sibling temp file,
    /// then rename over the real path (spec §4.1 "write to a sibling
    /// temp file, then rename").
    fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::StoreIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let serialized = serde_json::to_vec_pretty(document).map_err(|e| Error::StoreIo {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        let write_result = (|| -> std::io::Result<()> {
            use std::io::Write;
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(&serialized)?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(source) = write_result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(Error::StoreIo { path: temp_path, source });
        }

        std::fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&temp_path);
            Error::StoreIo { path: self.path.clone(), source }
        })?;

        Ok(())
    }

    /// Upsert by `session_name` (spec §4.1 `save`).
    pub fn save(&self, descriptor: SessionDescriptor) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        document.insert(descriptor.session_name.clone(), descriptor);
        self.write_document(&document)?;
        debug!(event = "store.save_completed");
        Ok(())
    }

    /// Partial update of `port`; `NotFound` if the session isn't known.
    pub fn update_port(&self, session_name: &str, port: u16) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        let descriptor = document
            .get_mut(session_name)
            .ok_or_else(|| Error::NotFound(session_name.to_string()))?;
        descriptor.port = Some(port);
        descriptor.updated_at = Utc::now().to_rfc3339();
        self.write_document(&document)?;
        Ok(())
    }

    /// Full descriptor for `session_name`, or `NotFound`.
    pub fn get(&self, session_name: &str) -> Result<SessionDescriptor> {
        let document = self.read_document()?;
        document
            .get(session_name)
            .cloned()
            .ok_or_else(|| Error::NotFound(session_name.to_string()))
    }

    /// `session_name`s belonging to `repo_prefix` whose terminal session
    /// still exists. Nonexistent entries are filtered but not deleted —
    /// deletion is the caller's responsibility (spec §4.1).
    pub fn list_active_for_repo(&self, repo_prefix: &str) -> Result<Vec<String>> {
        let document = self.read_document()?;
        let mut active = Vec::new();
        for (session_name, descriptor) in document.iter() {
            if descriptor.repo_prefix() != Some(repo_prefix) {
                continue;
            }
            let target = format!("{session_name}:agent");
            if self.term.has_session(&target) {
                active.push(session_name.clone());
            } else {
                debug!(event = "store.stale_entry_skipped", session_name = %session_name);
            }
        }
        active.sort();
        Ok(active)
    }

    /// Read and fully replace the document (used by reset/cleanup flows).
    pub fn remove(&self, session_name: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        if document.remove(session_name).is_none() {
            warn!(event = "store.remove_missing_entry", session_name = %session_name);
        }
        self.write_document(&document)?;
        Ok(())
    }

    /// All descriptors currently on disk, regardless of repo or liveness.
    /// Used by the activity monitor, which does its own raw read instead
    /// (spec §4.6), but kept here for CLI/listing consumers.
    pub fn all(&self) -> Result<Vec<SessionDescriptor>> {
        Ok(self.read_document()?.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_term::FakeTerminalDriver;
    use tempfile::TempDir;

    fn store(dir: &TempDir, term: Arc<dyn TerminalDriver>) -> StateStore {
        let paths = SwarmPaths::from_dir(dir.path().to_path_buf());
        StateStore::new(&paths, term)
    }

    fn descriptor(session_name: &str) -> SessionDescriptor {
        SessionDescriptor::new(
            "do the thing",
            session_name,
            session_name,
            "/tmp/wt",
            None,
            "claude",
            Utc::now().to_rfc3339(),
        )
    }

    #[test]
    fn save_then_get_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = store(&dir, term);
        store.save(descriptor("agent-proj-abc123-newt")).expect("save");
        let fetched = store.get("agent-proj-abc123-newt").expect("get");
        assert_eq!(fetched.session_name, "agent-proj-abc123-newt");
    }

    #[test]
    fn get_missing_session_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = store(&dir, term);
        let err = store.get("does-not-exist").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn update_port_on_missing_session_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = store(&dir, term);
        let err = store.update_port("ghost", 4000).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn update_port_persists_and_bumps_updated_at() {
        let dir = TempDir::new().expect("tempdir");
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = store(&dir, term);
        let original = descriptor("agent-proj-abc123-newt");
        let original_updated_at = original.updated_at.clone();
        store.save(original).expect("save");

        store.update_port("agent-proj-abc123-newt", 5173).expect("update");
        let fetched = store.get("agent-proj-abc123-newt").expect("get");
        assert_eq!(fetched.port, Some(5173));
        assert_ne!(fetched.updated_at, original_updated_at);
    }

    #[test]
    fn list_active_for_repo_filters_by_prefix_and_liveness() {
        let dir = TempDir::new().expect("tempdir");
        let fake_term = FakeTerminalDriver::new();
        fake_term.new_session("agent-proj-abc123-newt", Path::new("/tmp")).expect("seed session");
        let term: Arc<dyn TerminalDriver> = Arc::new(fake_term);
        let store = store(&dir, term);

        store.save(descriptor("agent-proj-abc123-newt")).expect("save live");
        store.save(descriptor("agent-proj-abc123-ghost")).expect("save dead");
        store.save(descriptor("agent-other-def456-newt")).expect("save other repo");

        let active = store.list_active_for_repo("agent-proj-abc123-").expect("list");
        assert_eq!(active, vec!["agent-proj-abc123-newt".to_string()]);
    }

    #[test]
    fn unknown_fields_on_disk_survive_a_save_of_an_unrelated_entry() {
        let dir = TempDir::new().expect("tempdir");
        let term: Arc<dyn TerminalDriver> = Arc::new(FakeTerminalDriver::new());
        let store = store(&dir, term);

        let raw = serde_json::json!({
            "agent-proj-abc123-newt": {
                "prompt": "hi",
                "branchName": "b",
                "sessionName": "agent-proj-abc123-newt",
                "worktreePath": "/tmp/wt",
                "port": null,
                "model": "claude",
                "updatedAt": "2026-01-01T00:00:00Z",
                "futureField": "kept"
            }
        });
        std::fs::write(store.state_path(), serde_json::to_vec(&raw).expect("serialize")).expect("seed file");

        store.save(descriptor("agent-other-def456-zed")).expect("save");

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.state_path()).expect("read")).expect("parse");
        assert_eq!(
            on_disk["agent-proj-abc123-newt"]["futureField"],
            serde_json::json!("kept")
        );
    }
}
