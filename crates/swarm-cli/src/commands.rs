//! Command handlers: each builds the shared [`SwarmDeps`] bundle, then
//! drives exactly one core subsystem (spec §6 CLI contracts).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use swarm_core::{Config, RandomNameSource};
use swarm_engine::deps::SwarmDeps;
use swarm_engine::{fan_out, graft, spawn_batch, ActivityMonitor, Watcher};
use swarm_paths::SwarmPaths;
use swarm_scm::GitDriver;
use swarm_store::StateStore;
use swarm_term::TmuxDriver;

use crate::agent_specs;

fn current_repo() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn build_deps() -> Result<SwarmDeps, String> {
    let paths = Arc::new(SwarmPaths::resolve().map_err(|e| e.to_string())?);
    let term = Arc::new(TmuxDriver::discover().map_err(|e| e.to_string())?);
    let term: Arc<dyn swarm_term::TerminalDriver> = term;
    let scm = Arc::new(GitDriver::discover().map_err(|e| e.to_string())?);
    let scm: Arc<dyn swarm_scm::ScmDriver> = scm;
    let store = Arc::new(StateStore::new(&paths, term.clone()));

    Ok(SwarmDeps { term, scm, store, paths, names: Arc::new(RandomNameSource) })
}

fn load_config(matches: &ArgMatches) -> Config {
    match matches.get_one::<String>("config") {
        Some(path) => Config::load(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: could not load config at {path}: {e}. Using defaults.");
            error!(event = "cli.config.load_failed", path = %path, error = %e);
            Config::default()
        }),
        None => Config::default(),
    }
}

pub async fn run(matches: &ArgMatches) -> Result<(), String> {
    match matches.subcommand() {
        Some(("prompt", sub)) => prompt(sub, matches).await,
        Some(("watch", _)) => watch().await,
        Some(("run", sub)) => run_fanout(sub).await,
        Some(("checkpoint", sub)) => checkpoint(sub).await,
        _ => unreachable!("clap enforces subcommand_required"),
    }
}

async fn prompt(sub: &ArgMatches, root: &ArgMatches) -> Result<(), String> {
    let agents = sub.get_one::<String>("agents").ok_or("agents argument is required")?;
    let prompt_text = sub.get_one::<String>("prompt").ok_or("prompt argument is required")?;
    let specs = agent_specs::parse(agents)?;
    let config = load_config(root);
    let deps = build_deps()?;
    let repo = current_repo();

    let cancel = CancellationToken::new();
    spawn_batch(&deps, &repo, prompt_text, &specs, &config, &cancel)
        .await
        .map_err(|e| e.to_string())?;
    info!(event = "cli.prompt.batch_dispatched", agent_count = specs.len());
    Ok(())
}

async fn watch() -> Result<(), String> {
    let deps = build_deps()?;
    let repo = current_repo();

    let monitor = ActivityMonitor::new(deps.clone(), repo.clone());
    let watcher = Watcher::new(deps, repo);

    let monitor_cancel = CancellationToken::new();
    let quit = CancellationToken::new();

    let monitor_handle = tokio::spawn({
        let monitor_cancel = monitor_cancel.clone();
        async move { monitor.run(monitor_cancel).await }
    });
    let watcher_handle = tokio::spawn({
        let quit = quit.clone();
        async move { watcher.run(quit).await }
    });

    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "cli.watch.shutdown_signal");
    }
    monitor_cancel.cancel();
    quit.cancel();
    let _ = tokio::join!(monitor_handle, watcher_handle);
    Ok(())
}

async fn run_fanout(sub: &ArgMatches) -> Result<(), String> {
    let command = sub.get_one::<String>("command").ok_or("command argument is required")?;
    let delete = sub.get_flag("delete");
    let deps = build_deps()?;
    let repo = current_repo();

    let results = fan_out(&deps, &repo, command, delete).await.map_err(|e| e.to_string())?;
    for result in results {
        println!("=== {} ===", result.session_name);
        println!("{}", result.captured);
    }
    Ok(())
}

async fn checkpoint(sub: &ArgMatches) -> Result<(), String> {
    let agent = sub.get_one::<String>("agent").ok_or("agent argument is required")?;
    let message = sub.get_one::<String>("message").ok_or("message argument is required")?;
    let deps = build_deps()?;
    let repo = current_repo();

    graft(&deps, &repo, agent, message).await.map_err(|e| e.to_string())
}
