//! Production `TerminalDriver`: shells out to the `tmux` binary.
//!
//! Every operation maps to exactly one `tmux` subcommand invocation and
//! blocks for that subprocess's own runtime (spec §4.2, §5 "every call
//! into the Terminal or SCM drivers is a potentially-blocking subprocess
//! invocation").

use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, warn};

use crate::driver::TerminalDriver;
use crate::errors::{is_session_gone, Result, TermError};

/// Drives `tmux` located via `PATH`. Constructed once and shared across
/// every subsystem that needs to touch the terminal multiplexer.
pub struct TmuxDriver {
    binary: std::path::PathBuf,
}

impl TmuxDriver {
    /// Locate `tmux` on `PATH`. Fails `ToolMissing` if absent (spec §4.2).
    pub fn discover() -> Result<Self> {
        let binary = which::which("tmux").map_err(|_| TermError::ToolMissing)?;
        Ok(Self { binary })
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(&self.binary).args(args).output()
    }

    fn run_checked(&self, args: &[&str], op: &'static str) -> Result<Output> {
        let output = self.run(args).map_err(|e| {
            warn!(event = "term.tmux.spawn_failed", op, error = %e);
            TermError::CommandFailed(e.to_string())
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if is_session_gone(&stderr) {
                debug!(event = "term.tmux.target_gone", op, stderr = %stderr);
                return Err(TermError::NotFound(stderr));
            }
            warn!(event = "term.tmux.command_failed", op, stderr = %stderr);
            return Err(TermError::CommandFailed(stderr));
        }

        Ok(output)
    }
}

impl TerminalDriver for TmuxDriver {
    fn new_session(&self, name: &str, cwd: &Path) -> Result<()> {
        let cwd = cwd.to_string_lossy();
        self.run_checked(
            &["new-session", "-d", "-s", name, "-c", cwd.as_ref()],
            "new_session",
        )?;
        debug!(event = "term.tmux.new_session_completed", session = name);
        Ok(())
    }

    fn rename_window(&self, target: &str, name: &str) -> Result<()> {
        self.run_checked(&["rename-window", "-t", target, name], "rename_window")?;
        Ok(())
    }

    fn new_window(&self, session: &str, name: &str, cwd: &Path) -> Result<()> {
        let cwd = cwd.to_string_lossy();
        self.run_checked(
            &["new-window", "-t", session, "-n", name, "-c", cwd.as_ref()],
            "new_window",
        )?;
        Ok(())
    }

    fn new_window_get_index(&self, session: &str) -> Result<u32> {
        let output = self.run_checked(
            &["new-window", "-t", session, "-P", "-F", "#{window_index}"],
            "new_window_get_index",
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        stdout
            .parse::<u32>()
            .map_err(|_| TermError::CommandFailed(format!("unparseable window index: {stdout}")))
    }

    fn send_keys(&self, target: &str, keys: &str, submit: bool) -> Result<()> {
        if submit {
            self.run_checked(&["send-keys", "-t", target, keys, "Enter"], "send_keys")?;
        } else {
            self.run_checked(&["send-keys", "-t", target, keys], "send_keys")?;
        }
        Ok(())
    }

    fn capture_pane(&self, target: &str) -> Result<String> {
        let output = self.run_checked(&["capture-pane", "-t", target, "-p"], "capture_pane")?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn has_session(&self, target: &str) -> bool {
        match self.run(&["has-session", "-t", target]) {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!(event = "term.tmux.has_session_probe_failed", error = %e);
                false
            }
        }
    }

    fn kill_window(&self, target: &str) -> Result<()> {
        self.run_checked(&["kill-window", "-t", target], "kill_window")?;
        Ok(())
    }
}
