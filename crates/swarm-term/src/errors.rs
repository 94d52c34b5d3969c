//! Terminal Driver error kinds (spec §4.2 table).

#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("tmux binary not found on PATH")]
    ToolMissing,

    #[error("terminal target not found: {0}")]
    NotFound(String),

    #[error("session already exists: {0}")]
    AlreadyExists(String),

    #[error("tmux command failed: {0}")]
    CommandFailed(String),
}

impl From<TermError> for swarm_core::Error {
    fn from(e: TermError) -> Self {
        match e {
            TermError::ToolMissing => swarm_core::Error::ToolMissing("tmux".to_string()),
            TermError::NotFound(target) => swarm_core::Error::NotFound(target),
            TermError::AlreadyExists(name) => swarm_core::Error::AlreadyExists(name),
            TermError::CommandFailed(stderr) => swarm_core::Error::ScmFailed { stderr },
        }
    }
}

pub type Result<T> = std::result::Result<T, TermError>;

/// `true` when `stderr` names a tmux "the session/target is gone" failure
/// (spec §4.7 "errors whose text contains `session not found` or
/// `can't find session` cause self-termination").
pub fn is_session_gone(stderr: &str) -> bool {
    stderr.contains("session not found") || stderr.contains("can't find session")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_both_session_gone_signatures() {
        assert!(is_session_gone("can't find session: agent-x"));
        assert!(is_session_gone("session not found"));
        assert!(!is_session_gone("unrelated failure"));
    }
}
