//! Spawn Orchestrator (spec §4.5): turns a prompt and a set of agent
//! specs into live tmux sessions backed by fresh git worktrees.
//!
//! Per-iteration isolation (spec §7): any failure in steps 5-10 logs and
//! moves to the next iteration. This function always returns `Ok(())` —
//! the batch as a whole never fails, only individual agents within it.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use swarm_core::{AgentSpec, Config, Result, SessionDescriptor};

use crate::deps::SwarmDeps;
use crate::repo_identity::RepoIdentity;

/// Substitute the literal `$PORT` token in a dev-server command template
/// (spec §6 "occurrences of the literal `$PORT` are replaced").
fn substitute_port(template: &str, port: u16) -> String {
    template.replace("$PORT", &port.to_string())
}

pub async fn spawn_batch(
    deps: &SwarmDeps,
    repo: &Path,
    prompt: &str,
    agent_specs: &[AgentSpec],
    config: &Config,
    cancel: &CancellationToken,
) -> Result<()> {
    let identity = RepoIdentity::resolve(deps.scm.as_ref(), repo)?;
    let worktrees_dir = deps.paths.worktrees_dir();

    std::fs::create_dir_all(&worktrees_dir).map_err(|source| swarm_core::Error::StoreIo {
        path: worktrees_dir.clone(),
        source,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(&worktrees_dir, std::fs::Permissions::from_mode(0o755));
    }

    // Grows monotonically across the whole batch (spec §4.5 step 7b,
    // invariant 3): a freshly-bound port is immediately released by the
    // probe, so without this set a second iteration's bind-probe would
    // see it as free again.
    let mut reserved_ports: HashSet<u16> = HashSet::new();

    for spec in agent_specs {
        if cancel.is_cancelled() {
            info!(event = "engine.spawn.batch_cancelled", tag = %spec.tag);
            return Ok(());
        }

        for i in 0..spec.count {
            spawn_one(
                deps,
                repo,
                prompt,
                spec,
                config,
                &identity,
                &worktrees_dir,
                i,
                &mut reserved_ports,
            )
            .await;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn spawn_one(
    deps: &SwarmDeps,
    repo: &Path,
    prompt: &str,
    spec: &AgentSpec,
    config: &Config,
    identity: &RepoIdentity,
    worktrees_dir: &Path,
    i: usize,
    reserved_ports: &mut HashSet<u16>,
) {
    let display = deps.names.draw();
    let command = if spec.is_random() { display.clone() } else { spec.command.clone() };

    let suffix = format!("{}-{i}", Utc::now().timestamp());
    let branch_name = format!("{display}-{}-{}-{suffix}", identity.project, identity.short_hash);
    let worktree_name = branch_name.clone();
    let session_name = format!("{}{display}", identity.prefix());
    let worktree_path = worktrees_dir.join(&worktree_name);

    if let Err(e) = deps.scm.worktree_add(repo, &branch_name, &worktree_path) {
        warn!(event = "engine.spawn.worktree_add_failed", session_name = %session_name, error = %e);
        return;
    }

    if let Err(e) = deps.term.new_session(&session_name, &worktree_path) {
        warn!(event = "engine.spawn.new_session_failed", session_name = %session_name, error = %e);
        return;
    }
    if let Err(e) = deps.term.rename_window(&format!("{session_name}:0"), "agent") {
        warn!(event = "engine.spawn.rename_window_failed", session_name = %session_name, error = %e);
        return;
    }

    let mut port = None;
    if config.has_dev_server() {
        if let Some((start, end)) = config.parsed_port_range() {
            match swarm_ports::allocate(start, end, reserved_ports) {
                Ok(allocated) => {
                    reserved_ports.insert(allocated);
                    let dev_command = config.dev_command.as_deref().unwrap_or_default();
                    let substituted = substitute_port(dev_command, allocated);
                    if let Err(e) = deps.term.new_window(&session_name, "uzi-dev", &worktree_path) {
                        warn!(event = "engine.spawn.dev_window_failed", session_name = %session_name, error = %e);
                        return;
                    }
                    if let Err(e) =
                        deps.term.send_keys(&format!("{session_name}:uzi-dev"), &substituted, true)
                    {
                        warn!(event = "engine.spawn.dev_command_failed", session_name = %session_name, error = %e);
                        return;
                    }
                    port = Some(allocated);
                }
                Err(e) => {
                    warn!(event = "engine.spawn.no_free_port", session_name = %session_name, error = %e);
                }
            }
        }
    }

    let agent_target = format!("{session_name}:agent");
    if let Err(e) = deps.term.send_keys(&agent_target, "", true) {
        warn!(event = "engine.spawn.clear_prompt_failed", session_name = %session_name, error = %e);
        return;
    }

    let seeded = format!("{command} \"{prompt}\"");
    if let Err(e) = deps.term.send_keys(&agent_target, &seeded, true) {
        warn!(event = "engine.spawn.seed_prompt_failed", session_name = %session_name, error = %e);
        return;
    }

    let descriptor = SessionDescriptor::new(
        prompt,
        branch_name,
        session_name.clone(),
        worktree_path.to_string_lossy(),
        port,
        command,
        Utc::now().to_rfc3339(),
    );
    if let Err(e) = deps.store.save(descriptor) {
        warn!(event = "engine.spawn.persist_failed", session_name = %session_name, error = %e);
        return;
    }

    info!(event = "engine.spawn.agent_ready", session_name = %session_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swarm_core::RandomNameSource;
    use swarm_paths::SwarmPaths;
    use swarm_scm::FakeScmDriver;
    use swarm_store::StateStore;
    use swarm_term::FakeTerminalDriver;
    use tempfile::TempDir;

    fn deps(dir: &TempDir) -> (SwarmDeps, Arc<FakeTerminalDriver>, Arc<FakeScmDriver>) {
        let paths = Arc::new(SwarmPaths::from_dir(dir.path().to_path_buf()));
        let term = Arc::new(FakeTerminalDriver::new());
        let scm = Arc::new(FakeScmDriver::new());
        let store = Arc::new(StateStore::new(&paths, term.clone() as Arc<dyn swarm_term::TerminalDriver>));
        let deps = SwarmDeps {
            term: term.clone() as Arc<dyn swarm_term::TerminalDriver>,
            scm: scm.clone() as Arc<dyn swarm_scm::ScmDriver>,
            store,
            paths,
            names: Arc::new(RandomNameSource),
        };
        (deps, term, scm)
    }

    #[tokio::test]
    async fn successful_spawn_persists_one_descriptor_per_count() {
        let dir = TempDir::new().expect("tempdir");
        let (deps, _term, _scm) = deps(&dir);
        let specs = vec![AgentSpec::new("claude", "claude", 2)];
        let cancel = CancellationToken::new();

        spawn_batch(&deps, Path::new("/repo"), "do the thing", &specs, &Config::default(), &cancel)
            .await
            .expect("batch never fails");

        let all = deps.store.all().expect("list");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn worktree_add_failure_skips_that_iteration_but_not_the_batch() {
        let dir = TempDir::new().expect("tempdir");
        let (deps, _term, scm) = deps(&dir);
        *scm.fail_worktree_add.lock() = true;
        let specs = vec![AgentSpec::new("claude", "claude", 1)];
        let cancel = CancellationToken::new();

        spawn_batch(&deps, Path::new("/repo"), "hi", &specs, &Config::default(), &cancel)
            .await
            .expect("batch never fails");

        assert!(deps.store.all().expect("list").is_empty());
    }

    #[tokio::test]
    async fn dev_server_config_opens_a_second_window_and_records_port() {
        let dir = TempDir::new().expect("tempdir");
        let (deps, term, _scm) = deps(&dir);
        let specs = vec![AgentSpec::new("claude", "claude", 1)];
        let config = Config::from_yaml_str("devCommand: \"serve --port $PORT\"\nportRange: \"20500-20510\"\n")
            .expect("parse config");
        let cancel = CancellationToken::new();

        spawn_batch(&deps, Path::new("/repo"), "hi", &specs, &config, &cancel)
            .await
            .expect("batch never fails");

        let descriptors = deps.store.all().expect("list");
        assert_eq!(descriptors.len(), 1);
        assert!(descriptors[0].port.is_some());

        let calls = term.send_keys_log.lock();
        assert!(calls.iter().any(|c| c.target.ends_with(":uzi-dev")));
    }

    #[tokio::test]
    async fn port_exhaustion_skips_the_second_agent_but_keeps_the_first() {
        // Spec §8 scenario 2: a single-port range with two requested
        // agents must reserve the only port for the first and fail the
        // second, leaving exactly one descriptor in the store.
        let dir = TempDir::new().expect("tempdir");
        let (deps, _term, _scm) = deps(&dir);
        let specs = vec![AgentSpec::new("claude", "claude", 2)];
        let config = Config::from_yaml_str("devCommand: \"serve --port $PORT\"\nportRange: \"20700-20700\"\n")
            .expect("parse config");
        let cancel = CancellationToken::new();

        spawn_batch(&deps, Path::new("/repo"), "hi", &specs, &config, &cancel)
            .await
            .expect("batch never fails");

        let descriptors = deps.store.all().expect("list");
        assert_eq!(descriptors.len(), 2, "both agents still get a descriptor");
        let ports: Vec<_> = descriptors.iter().filter_map(|d| d.port).collect();
        assert_eq!(ports.len(), 1, "only the first agent gets the sole port in range");
    }
}
