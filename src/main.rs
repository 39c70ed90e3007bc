//! warden daemon
//!
//! # Architecture Overview
//!
//! ```text
//!   warden.json ──▶ config::loader ──▶ config::validation ──▶ canonical Config
//!                                                                  │
//!                                                                  ▼
//!                                   ┌──────────────────── Supervisor ─────────────────────┐
//!                                   │  state: RwLock<started, shutdown>                   │
//!                                   │  apps:     id → App     { RwLock<RunState> }        │
//!                                   │  services: id → Service { RwLock<RunState> }        │
//!                                   └──────────────┬──────────────────────┬───────────────┘
//!                                                  │                      │
//!                                      tick loop (this binary)     get_status() → Status JSON
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::task::JoinHandle;

use warden::config::{load_config, Config};
use warden::lifecycle::{signals, startup, Shutdown};
use warden::observability::logging;
use warden::supervisor::{Hooks, Supervisor};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Supervise apps and services", long_about = None)]
struct Cli {
    /// Path to the configuration file (JSON, or TOML by extension).
    #[arg(short, long, default_value = "warden.json")]
    config: PathBuf,

    /// Validate the configuration, print its canonical form and exit.
    #[arg(long)]
    check: bool,

    /// Default log directive when RUST_LOG is unset.
    #[arg(long, default_value = "warden=info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    if cli.check {
        let config: Config = load_config(&cli.config)?.normalized()?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!("warden v{} starting", env!("CARGO_PKG_VERSION"));

    let hooks = Hooks::new().on_tick(|supervisor: &Supervisor| {
        let status = supervisor.get_status();
        tracing::debug!(
            apps = status.apps.len(),
            services = status.services.len(),
            "Status"
        );
    });
    let supervisor = Arc::new(startup::build(&cli.config, hooks)?);
    supervisor.start()?;

    let shutdown = Shutdown::new();
    let ticker = tokio::spawn(run_ticker(supervisor.clone(), shutdown.subscribe()));

    signals::wait().await?;
    shutdown.trigger();
    join_ticker(ticker).await;

    supervisor.shutdown();
    println!("{}", serde_json::to_string_pretty(&supervisor.get_status())?);

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_ticker(
    supervisor: Arc<Supervisor>,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(supervisor.config().tick_interval());

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !supervisor.tick() {
                    break;
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Tick loop received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

async fn join_ticker(ticker: JoinHandle<()>) {
    if let Err(e) = ticker.await {
        tracing::warn!(error = %e, "Tick loop ended abnormally");
    }
}
