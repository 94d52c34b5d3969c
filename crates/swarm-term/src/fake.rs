//! Recording fake `TerminalDriver` for deterministic tests (spec §9
//! "tests bind them to recording fakes").

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;

use crate::driver::TerminalDriver;
use crate::errors::{Result, TermError};

#[derive(Debug, Clone)]
pub struct Window {
    pub name: String,
    pub cwd: std::path::PathBuf,
    pub pane_contents: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub windows: Vec<Window>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendKeysCall {
    pub target: String,
    pub keys: String,
    pub submit: bool,
}

/// An in-memory stand-in for a tmux server: sessions, windows, and a
/// growing call log so tests can assert on exactly what a subsystem did.
#[derive(Default)]
pub struct FakeTerminalDriver {
    sessions: Mutex<HashMap<String, Session>>,
    pub send_keys_log: Mutex<Vec<SendKeysCall>>,
    pub killed_windows: Mutex<Vec<String>>,
}

impl FakeTerminalDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a pane's content, as if an agent had already printed it.
    pub fn set_pane_contents(&self, session: &str, window: &str, contents: &str) {
        let mut sessions = self.sessions.lock();
        if let Some(s) = sessions.get_mut(session) {
            if let Some(w) = s.windows.iter_mut().find(|w| w.name == window) {
                w.pane_contents = contents.to_string();
            }
        }
    }

    pub fn session_exists(&self, name: &str) -> bool {
        self.sessions.lock().contains_key(name)
    }

    fn split_target<'a>(&self, target: &'a str) -> (String, &'a str) {
        match target.split_once(':') {
            Some((s, w)) => (s.to_string(), w),
            None => (target.to_string(), "agent"),
        }
    }
}

impl TerminalDriver for FakeTerminalDriver {
    fn new_session(&self, name: &str, cwd: &Path) -> Result<()> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(name) {
            return Err(TermError::AlreadyExists(name.to_string()));
        }
        sessions.insert(
            name.to_string(),
            Session {
                windows: vec![Window {
                    name: "0".to_string(),
                    cwd: cwd.to_path_buf(),
                    pane_contents: String::new(),
                }],
            },
        );
        Ok(())
    }

    fn rename_window(&self, target: &str, name: &str) -> Result<()> {
        let (session, window) = self.split_target(target);
        let mut sessions = self.sessions.lock();
        let s = sessions
            .get_mut(&session)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        let w = s
            .windows
            .iter_mut()
            .find(|w| w.name == window)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        w.name = name.to_string();
        Ok(())
    }

    fn new_window(&self, session: &str, name: &str, cwd: &Path) -> Result<()> {
        let mut sessions = self.sessions.lock();
        let s = sessions
            .get_mut(session)
            .ok_or_else(|| TermError::NotFound(session.to_string()))?;
        s.windows.push(Window {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            pane_contents: String::new(),
        });
        Ok(())
    }

    fn new_window_get_index(&self, session: &str) -> Result<u32> {
        let mut sessions = self.sessions.lock();
        let s = sessions
            .get_mut(session)
            .ok_or_else(|| TermError::NotFound(session.to_string()))?;
        let idx = s.windows.len() as u32;
        s.windows.push(Window {
            name: idx.to_string(),
            cwd: std::path::PathBuf::new(),
            pane_contents: String::new(),
        });
        Ok(idx)
    }

    fn send_keys(&self, target: &str, keys: &str, submit: bool) -> Result<()> {
        self.send_keys_log.lock().push(SendKeysCall {
            target: target.to_string(),
            keys: keys.to_string(),
            submit,
        });
        let (session, window) = self.split_target(target);
        let mut sessions = self.sessions.lock();
        let s = sessions
            .get_mut(&session)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        let w = s
            .windows
            .iter_mut()
            .find(|w| w.name == window)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        w.pane_contents.push_str(keys);
        if submit {
            w.pane_contents.push('\n');
        }
        Ok(())
    }

    fn capture_pane(&self, target: &str) -> Result<String> {
        let (session, window) = self.split_target(target);
        let sessions = self.sessions.lock();
        let s = sessions
            .get(&session)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        let w = s
            .windows
            .iter()
            .find(|w| w.name == window)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        Ok(w.pane_contents.clone())
    }

    fn has_session(&self, target: &str) -> bool {
        let (session, _) = self.split_target(target);
        self.sessions.lock().contains_key(&session)
    }

    fn kill_window(&self, target: &str) -> Result<()> {
        self.killed_windows.lock().push(target.to_string());
        let (session, window) = self.split_target(target);
        let mut sessions = self.sessions.lock();
        let s = sessions
            .get_mut(&session)
            .ok_or_else(|| TermError::NotFound(target.to_string()))?;
        s.windows.retain(|w| w.name != window);
        Ok(())
    }
}
