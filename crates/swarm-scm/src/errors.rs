//! Source-Control Driver error kinds (spec §4.3: "all failures surface as
//! `ScmFailed{stderr}`").

#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("git binary not found on PATH")]
    ToolMissing,

    #[error("git command failed: {stderr}")]
    Failed { stderr: String },
}

impl From<ScmError> for swarm_core::Error {
    fn from(e: ScmError) -> Self {
        match e {
            ScmError::ToolMissing => swarm_core::Error::ToolMissing("git".to_string()),
            ScmError::Failed { stderr } => swarm_core::Error::ScmFailed { stderr },
        }
    }
}

pub type Result<T> = std::result::Result<T, ScmError>;

/// Reject arguments that could smuggle an option or refspec into a `git`
/// invocation assembled from session/branch names we generated ourselves.
/// Kept defensive since names embed user-controlled project/remote text.
pub fn validate_git_arg(value: &str, label: &str) -> Result<()> {
    if value.starts_with('-') {
        return Err(ScmError::Failed {
            stderr: format!("invalid {label}: '{value}' must not start with '-'"),
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ScmError::Failed {
            stderr: format!("invalid {label}: contains control characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dash_prefixed_arg() {
        assert!(validate_git_arg("--force", "branch").is_err());
    }

    #[test]
    fn accepts_ordinary_branch_name() {
        assert!(validate_git_arg("agent-swarm-a1b2c3-1700000000-0", "branch").is_ok());
    }
}
