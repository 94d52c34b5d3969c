use tracing::error;

mod agent_specs;
mod app;
mod commands;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    let verbose = matches.get_flag("verbose");
    swarm_core::logging::init(verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("swarm: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(commands::run(&matches)) {
        error!(event = "cli.command_failed", error = %e);
        eprintln!("swarm: {e}");
        std::process::exit(1);
    }
}
