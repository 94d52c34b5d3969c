//! swarm-core: domain types, error kinds, and ambient stack shared by
//! every other swarm crate.
//!
//! - [`session`] — `SessionDescriptor`, the durable per-agent record.
//! - [`metrics`] — `Metrics`, `Status`, and the pure `classify` function.
//! - [`monitor`] — `SessionMonitorState`, the watcher's change-detection record.
//! - [`agent_spec`] — spawn input types.
//! - [`config`] — the YAML config shape (spec §6).
//! - [`names`] — agent display-name generation.
//! - [`error`] — the unified error enum (spec §7).
//! - [`logging`] — `tracing` subscriber install.

pub mod agent_spec;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod monitor;
pub mod names;
pub mod session;

pub use agent_spec::AgentSpec;
pub use config::Config;
pub use error::{Error, Result};
pub use metrics::{classify, Metrics, Status};
pub use monitor::SessionMonitorState;
pub use names::{FixedNameSource, NameSource, RandomNameSource};
pub use session::SessionDescriptor;
