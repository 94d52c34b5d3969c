//! `TerminalDriver` — the capability the spawn/watcher/fan-out
//! subsystems drive a detached terminal multiplexer through (spec §4.2).
//!
//! Production binds this to [`tmux::TmuxDriver`]; tests bind it to
//! [`fake::FakeTerminalDriver`].

use crate::errors::Result;
use std::path::Path;

pub trait TerminalDriver: Send + Sync {
    /// Create a detached session with one window, rooted at `cwd`.
    fn new_session(&self, name: &str, cwd: &Path) -> Result<()>;

    /// Rename window `target` (e.g. `"session:0"`) to `name`.
    fn rename_window(&self, target: &str, name: &str) -> Result<()>;

    /// Create a new window in `session` named `name`, rooted at `cwd`.
    fn new_window(&self, session: &str, name: &str, cwd: &Path) -> Result<()>;

    /// Create a new window in `session` and return its index.
    fn new_window_get_index(&self, session: &str) -> Result<u32>;

    /// Dispatch literal keystrokes to `target`; append Enter when `submit`.
    fn send_keys(&self, target: &str, keys: &str, submit: bool) -> Result<()>;

    /// Return the currently visible pane contents of `target`.
    fn capture_pane(&self, target: &str) -> Result<String>;

    /// Existence probe — never errors, returns `false` on any failure.
    fn has_session(&self, target: &str) -> bool;

    /// Remove a window (used by the fan-out runner's delete mode).
    fn kill_window(&self, target: &str) -> Result<()>;
}
