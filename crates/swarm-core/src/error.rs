//! Unified error enum for the swarm core (spec §7).
//!
//! Every subsystem's internal error type converts into this one at the
//! seam it crosses into a caller that needs to branch on error kind.
//! Structured logging happens at the call site that first observes the
//! failure, not here — this type only carries enough context to log.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("state store I/O failed at {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("source-control command failed: {stderr}")]
    ScmFailed { stderr: String },

    #[error("required external tool not found: {0}")]
    ToolMissing(String),

    #[error("no free port in range {start}-{end}")]
    NoFreePort { start: u16, end: u16 },

    #[error("no active sessions")]
    NoSessions,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("operation cancelled")]
    ContextCancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
