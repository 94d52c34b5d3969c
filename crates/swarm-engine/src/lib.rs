//! swarm-engine: the five engine components that sit above the state
//! store and the terminal/SCM drivers.
//!
//! - [`deps`] — the shared `SwarmDeps` capability bundle.
//! - [`repo_identity`] — the `agent-<project>-<hash>-` prefix derivation.
//! - [`spawn`] — C5 Spawn Orchestrator.
//! - [`monitor`] — C6 Activity Monitor.
//! - [`watcher`] — C7 Watcher.
//! - [`fanout`] — C8 Fan-out Runner.
//! - [`grafter`] — C9 Grafter.

pub mod deps;
pub mod fanout;
pub mod grafter;
pub mod monitor;
pub mod repo_identity;
pub mod spawn;
pub mod watcher;

pub use deps::SwarmDeps;
pub use fanout::{fan_out, FanoutResult};
pub use grafter::graft;
pub use monitor::ActivityMonitor;
pub use repo_identity::RepoIdentity;
pub use spawn::spawn_batch;
pub use watcher::Watcher;
