//! Production `ScmDriver`: shells out to the `git` binary.
//!
//! All git CLI calls live here so every one gets the same structured
//! logging and stderr classification (mirrors the centralized-wrapper
//! approach the rest of this codebase uses for its own subprocess
//! drivers).

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;
use tracing::{debug, warn};

use crate::driver::{DiffStat, LogSince, ScmDriver};
use crate::errors::{validate_git_arg, Result, ScmError};

pub struct GitDriver {
    binary: std::path::PathBuf,
}

impl GitDriver {
    pub fn discover() -> Result<Self> {
        let binary = which::which("git").map_err(|_| ScmError::ToolMissing)?;
        Ok(Self { binary })
    }

    fn run(&self, dir: &Path, args: &[&str]) -> std::io::Result<Output> {
        Command::new(&self.binary).current_dir(dir).args(args).output()
    }

    fn run_checked(&self, dir: &Path, args: &[&str], op: &'static str) -> Result<Output> {
        let output = self.run(dir, args).map_err(|e| {
            warn!(event = "scm.git.spawn_failed", op, error = %e);
            ScmError::Failed { stderr: e.to_string() }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(event = "scm.git.command_failed", op, stderr = %stderr);
            return Err(ScmError::Failed { stderr });
        }

        debug!(event = "scm.git.command_completed", op);
        Ok(output)
    }

    fn stdout_trimmed(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

impl ScmDriver for GitDriver {
    fn short_hash(&self, repo: &Path) -> Result<String> {
        let output = self.run_checked(repo, &["rev-parse", "--short", "HEAD"], "short_hash")?;
        Ok(Self::stdout_trimmed(&output))
    }

    fn remote_url(&self, repo: &Path) -> Result<Option<String>> {
        let output = self.run(repo, &["remote", "get-url", "origin"]).map_err(|e| {
            warn!(event = "scm.git.spawn_failed", op = "remote_url", error = %e);
            ScmError::Failed { stderr: e.to_string() }
        })?;
        if !output.status.success() {
            debug!(event = "scm.git.remote_url_absent");
            return Ok(None);
        }
        let url = Self::stdout_trimmed(&output);
        Ok(if url.is_empty() { None } else { Some(url) })
    }

    fn worktree_add(&self, repo: &Path, branch: &str, path: &Path) -> Result<()> {
        validate_git_arg(branch, "branch name")?;
        let path = path.to_string_lossy();
        self.run_checked(
            repo,
            &["worktree", "add", "-b", branch, path.as_ref()],
            "worktree_add",
        )?;
        Ok(())
    }

    fn worktree_remove(&self, repo: &Path, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_checked(
            repo,
            &["worktree", "remove", "--force", path.as_ref()],
            "worktree_remove",
        )?;
        Ok(())
    }

    fn log_since(&self, path: &Path, since: Duration) -> Result<LogSince> {
        let cutoff: DateTime<Utc> = Utc::now()
            - chrono::Duration::from_std(since).unwrap_or(chrono::Duration::zero());
        let cutoff = cutoff.to_rfc3339_opts(SecondsFormat::Secs, true);
        let since_arg = format!("--since={cutoff}");
        let output = self.run_checked(
            path,
            &["log", since_arg.as_str(), "--format=%cI"],
            "log_since",
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let timestamps: Vec<DateTime<Utc>> = stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| DateTime::parse_from_rfc3339(l.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .collect();
        Ok(LogSince {
            commit_count: timestamps.len() as u64,
            last_commit_at: timestamps.into_iter().max(),
        })
    }

    fn diff_shortstat(&self, path: &Path) -> Result<DiffStat> {
        self.run_checked(path, &["add", "-A"], "diff_shortstat.stage_all")?;
        let output = self.run_checked(
            path,
            &["diff", "--cached", "--shortstat"],
            "diff_shortstat.diff_cached",
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stat = parse_shortstat(&stdout);
        self.run_checked(path, &["reset"], "diff_shortstat.reset")?;
        Ok(stat)
    }

    fn rebase(&self, path: &Path, branch: &str) -> Result<()> {
        validate_git_arg(branch, "base branch")?;
        self.run_checked(path, &["rebase", branch], "rebase")?;
        Ok(())
    }

    fn commit(&self, path: &Path, message: &str) -> Result<()> {
        self.run_checked(path, &["add", "-A"], "commit.stage_all")?;
        self.run_checked(path, &["commit", "-m", message], "commit")?;
        Ok(())
    }

    fn reset_hard(&self, path: &Path) -> Result<()> {
        self.run_checked(path, &["reset", "--hard"], "reset_hard")?;
        Ok(())
    }
}

/// Parse `git diff --shortstat` output, e.g.
/// `" 3 files changed, 10 insertions(+), 2 deletions(-)"`. Any absent
/// counter (no insertions, no deletions) is simply not present in the
/// line and defaults to zero.
fn parse_shortstat(line: &str) -> DiffStat {
    let mut stat = DiffStat::default();
    for part in line.split(',') {
        let part = part.trim();
        let Some(count) = part.split_whitespace().next().and_then(|n| n.parse::<u64>().ok())
        else {
            continue;
        };
        if part.contains("file") {
            stat.files_changed = count;
        } else if part.contains("insertion") {
            stat.insertions = count;
        } else if part.contains("deletion") {
            stat.deletions = count;
        }
    }
    stat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_shortstat_line() {
        let stat = parse_shortstat(" 3 files changed, 10 insertions(+), 2 deletions(-)");
        assert_eq!(stat.files_changed, 3);
        assert_eq!(stat.insertions, 10);
        assert_eq!(stat.deletions, 2);
    }

    #[test]
    fn parses_insertions_only_line() {
        let stat = parse_shortstat(" 1 file changed, 5 insertions(+)");
        assert_eq!(stat.files_changed, 1);
        assert_eq!(stat.insertions, 5);
        assert_eq!(stat.deletions, 0);
    }

    #[test]
    fn parses_empty_line_as_zero() {
        let stat = parse_shortstat("");
        assert_eq!(stat, DiffStat::default());
    }
}
