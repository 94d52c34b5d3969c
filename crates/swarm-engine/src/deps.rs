//! Shared handles every subsystem in this crate is driven through.

use std::sync::Arc;

use swarm_core::NameSource;
use swarm_paths::SwarmPaths;
use swarm_scm::ScmDriver;
use swarm_store::StateStore;
use swarm_term::TerminalDriver;

/// Bundles the capabilities the spawn orchestrator, monitor, watcher,
/// fan-out runner, and grafter all need. Cloning is cheap — every field
/// is an `Arc`.
#[derive(Clone)]
pub struct SwarmDeps {
    pub term: Arc<dyn TerminalDriver>,
    pub scm: Arc<dyn ScmDriver>,
    pub store: Arc<StateStore>,
    pub paths: Arc<SwarmPaths>,
    pub names: Arc<dyn NameSource>,
}
