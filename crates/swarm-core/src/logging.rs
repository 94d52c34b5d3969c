//! Process-wide `tracing` subscriber installation (spec §1 "generic
//! logging" collaborator).
//!
//! Installed once at process start by the CLI binary. Every subsystem
//! below logs through `tracing::{debug,info,warn,error}!` with a
//! structured `event = "component.action_outcome"` field, never through
//! `println!`/`eprintln!`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once — only the
/// first call takes effect, matching the teacher's own `init_logging`
/// idempotency (repeated daemon restarts within one test process must
/// not panic on "subscriber already set").
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = if verbose {
            tracing_subscriber::EnvFilter::new("debug")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    });
}
