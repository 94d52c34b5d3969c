//! `clap` command wiring (spec §6 "CLI contracts (surface only)").
//!
//! Each subcommand drives exactly one core subsystem: `prompt` the Spawn
//! Orchestrator, `watch` the Activity Monitor + Watcher, `run` the
//! Fan-out Runner, `checkpoint` the Grafter.

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("swarm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Supervise a fleet of coding agents, each in its own tmux session and git worktree")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose (debug) logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to the YAML config file (devCommand/portRange)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(prompt_command())
        .subcommand(watch_command())
        .subcommand(run_command())
        .subcommand(checkpoint_command())
}

fn prompt_command() -> Command {
    Command::new("prompt")
        .about("Spawn a batch of agents and seed them with a prompt")
        .arg(
            Arg::new("agents")
                .long("agents")
                .short('a')
                .required(true)
                .help("Agent specs, e.g. \"claude:2,codex:1\" or \"claude:claude --danger:2\""),
        )
        .arg(
            Arg::new("prompt")
                .help("The prompt text dispatched into every spawned agent")
                .required(true)
                .index(1),
        )
}

fn watch_command() -> Command {
    Command::new("watch").about(
        "Run the activity monitor and pane watcher until interrupted (Ctrl-C)",
    )
}

fn run_command() -> Command {
    Command::new("run")
        .about("Run a command in every live session's own window")
        .arg(
            Arg::new("delete")
                .long("delete")
                .help("Kill the spawned window after capturing its output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("command")
                .help("The command to dispatch")
                .required(true)
                .index(1),
        )
}

fn checkpoint_command() -> Command {
    Command::new("checkpoint")
        .about("Rebase a named agent's branch into this worktree as one commit")
        .arg(
            Arg::new("agent")
                .help("Display name of the agent to checkpoint")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("message")
                .help("Commit message for the consolidating commit")
                .required(true)
                .index(2),
        )
}
