//! `ledcoord` — the LED display coordinator daemon.
//!
//! Owns the 64x64 matrix on behalf of every producer: binds the unix
//! socket, runs the accept loop on a background thread, and drives the
//! dispatch worker on the main thread. Exit code 0 after a clean shutdown
//! (`shutdown` command, SIGINT or SIGTERM), 1 on a startup failure (socket
//! bind, or hardware init outside mock mode).

use anyhow::{Context, Result};
use clap::Parser;
use core_anim::AnimationEngine;
use core_config::{Overrides, Settings};
use core_model::{Command, CommandKind, Priority};
use core_panel::{MockPanel, Panel};
use core_queue::CommandQueue;
use ledcoord::coordinator::Coordinator;
use ledcoord::server::IpcServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ledcoord", version, about = "LED display coordinator daemon")]
struct Args {
    /// Socket path override (also: LED_SOCKET_PATH).
    #[arg(long)]
    socket: Option<PathBuf>,
    /// Hardware config file override (default: led-manager.toml discovery).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run without hardware; presents are recorded and logged
    /// (also: LED_MOCK_MODE).
    #[arg(long)]
    mock: bool,
}

fn main() -> Result<()> {
    configure_logging();
    let args = Args::parse();
    let settings = Settings::resolve(Overrides {
        socket_path: args.socket,
        config_path: args.config,
        mock_mode: args.mock,
    })?;

    let panel = build_panel(&settings)?;
    let queue = Arc::new(CommandQueue::new());
    let engine = Arc::new(AnimationEngine::new());

    install_signal_handler(Arc::clone(&queue))?;

    let server = Arc::new(IpcServer::bind(
        &settings.socket_path,
        Arc::clone(&queue),
        Arc::clone(&engine),
    )?);
    let socket_path = server.socket_path().to_path_buf();
    server.spawn();

    info!(
        target: "runtime",
        socket = %socket_path.display(),
        mock = settings.mock_mode,
        "startup_complete"
    );

    // Dispatch loop on the main thread; returns on shutdown.
    Coordinator::new(queue, engine, panel).run();

    if let Err(e) = std::fs::remove_file(&socket_path) {
        warn!(target: "runtime", error = %e, "socket_cleanup_failed");
    }
    info!(target: "runtime", "shutdown_complete");
    Ok(())
}

fn configure_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// SIGINT/SIGTERM inject a high-priority shutdown command so signal exits
/// and protocol exits share one code path.
fn install_signal_handler(queue: Arc<CommandQueue>) -> Result<()> {
    ctrlc::set_handler(move || {
        info!(target: "runtime", "termination_signal");
        // push can only fail once shutdown is already underway
        let _ = queue.push(Command::new(CommandKind::Shutdown, Priority::High, 0));
    })
    .context("install signal handler")
}

fn build_panel(settings: &Settings) -> Result<Arc<dyn Panel>> {
    if settings.mock_mode {
        info!(target: "runtime", "mock_panel_selected");
        return Ok(Arc::new(MockPanel::new()));
    }
    hardware_panel(settings)
}

#[cfg(feature = "hub75")]
fn hardware_panel(settings: &Settings) -> Result<Arc<dyn Panel>> {
    let panel = core_panel::Hub75Panel::open(&settings.panel)
        .context("hardware init (run with --mock for no-panel mode)")?;
    Ok(Arc::new(panel))
}

#[cfg(not(feature = "hub75"))]
fn hardware_panel(_settings: &Settings) -> Result<Arc<dyn Panel>> {
    anyhow::bail!("built without hub75 support; run with --mock or set LED_MOCK_MODE=1")
}
