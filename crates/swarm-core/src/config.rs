//! Configuration shape (spec §6): a YAML document with two optional keys.
//!
//! Discovering *which* file to read is out of scope (spec §1) — callers
//! hand this module a path or a string and it parses, validates, and
//! hands back a `Config`. A missing file, or a present file missing
//! either key, is not an error; only malformed YAML or an out-of-range
//! `portRange` is.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "devCommand", default)]
    pub dev_command: Option<String>,
    #[serde(rename = "portRange", default)]
    pub port_range: Option<String>,
}

impl Config {
    /// Parse a YAML document already read into memory.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Load and parse a config file. A missing file yields `Config::default()`
    /// (spec §6 "missing or empty keys disable the dev-server branch... without error").
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::StoreIo {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Whether the dev-server branch of spawn (spec §4.5 step 7) should run.
    pub fn has_dev_server(&self) -> bool {
        !self.dev_command.as_deref().unwrap_or("").is_empty() && self.port_range.is_some()
    }

    /// Parse `portRange` as `"<start>-<end>"`, validating `start > 0 ∧ end ≥ start`
    /// (spec §4.5 step 7a).
    pub fn parsed_port_range(&self) -> Option<(u16, u16)> {
        let raw = self.port_range.as_deref()?;
        let (start_str, end_str) = raw.split_once('-')?;
        let start: u16 = start_str.trim().parse().ok()?;
        let end: u16 = end_str.trim().parse().ok()?;
        if start == 0 || end < start {
            return None;
        }
        Some((start, end))
    }
}
