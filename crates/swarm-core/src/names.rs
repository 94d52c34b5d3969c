//! Agent display-name generation (spec §4.5 step 1).
//!
//! The exact word list is a thin collaborator out of scope for this
//! spec (§1) — what matters is the seam: something that hands the
//! Spawn Orchestrator a display name, swappable in tests for a
//! deterministic source.

/// A handful of short, lowercase, dash-free words — display names are
/// spliced directly into `session_name`/`branch_name`, which forbid dashes
/// in this position (see `swarm_core::session`).
const WORD_LIST: &[&str] = &[
    "newt", "finch", "otter", "heron", "lemur", "gecko", "panda", "raven", "viper", "tapir",
    "mole", "wren", "stoat", "ibis", "shrew", "swift", "civet", "coyote", "egret", "marten",
    "quail", "saiga", "tahr", "urial", "vole", "weasel", "xerus", "yak", "zebu", "adder",
];

/// Draws random display names for new agents.
pub trait NameSource: Send + Sync {
    fn draw(&self) -> String;
}

/// Production source: uniformly picks from the embedded word list.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNameSource;

impl NameSource for RandomNameSource {
    fn draw(&self) -> String {
        use rand::Rng;
        let mut rng = rand::rng();
        let idx = rng.random_range(0..WORD_LIST.len());
        WORD_LIST[idx].to_string()
    }
}

/// Deterministic source for tests: cycles through a fixed sequence.
#[derive(Debug, Clone)]
pub struct FixedNameSource {
    names: Vec<String>,
    next: std::sync::atomic::AtomicUsize,
}

impl FixedNameSource {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl NameSource for FixedNameSource {
    fn draw(&self) -> String {
        use std::sync::atomic::Ordering;
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.names.len().max(1);
        self.names.get(idx).cloned().unwrap_or_else(|| "agent".to_string())
    }
}
