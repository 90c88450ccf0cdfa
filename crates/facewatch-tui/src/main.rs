//! Facewatch TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Simulated stream server, in process
//! facewatch-tui
//!
//! # Real stream server
//! facewatch-tui --server ws://localhost:5000/ws --username alice
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use facewatch_client::transport::{ReconnectPolicy, TransportConfig};
use facewatch_tui::{
    AppEvent, ConnectionMode, KeyInput, Runtime, SimulationConfig, TerminalDriver,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Address shown in the status bar for the in-process server.
const SIMULATION_ADDR: &str = "simulation";

/// Facewatch terminal viewer
#[derive(Parser, Debug)]
#[command(name = "facewatch-tui")]
#[command(about = "Terminal viewer for Facewatch live streams")]
#[command(version)]
struct Args {
    /// WebSocket URL of the stream server
    ///
    /// If not provided, runs against an in-process simulated server.
    #[arg(short, long, env = "FACEWATCH_SERVER")]
    server: Option<String>,

    /// Join immediately under this name instead of prompting
    #[arg(short, long)]
    username: Option<String>,

    /// Delay before the first reconnect attempt, in milliseconds
    #[arg(long, default_value = "500")]
    reconnect_delay_ms: u64,

    /// Upper bound on any reconnect delay, in milliseconds
    #[arg(long, default_value = "10000")]
    max_reconnect_delay_ms: u64,

    /// Give up after this many consecutive failed reconnects
    #[arg(long)]
    max_reconnects: Option<u32>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            reconnect: ReconnectPolicy {
                initial_delay: Duration::from_millis(self.reconnect_delay_ms),
                max_delay: Duration::from_millis(self.max_reconnect_delay_ms),
                max_attempts: self.max_reconnects,
            },
            ..TransportConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    }

    let (mode, addr) = match &args.server {
        Some(addr) => (ConnectionMode::WebSocket(args.transport_config()), addr.clone()),
        None => (ConnectionMode::Simulation(SimulationConfig::default()), SIMULATION_ADDR.into()),
    };

    tracing::info!(server = %addr, "facewatch viewer starting");

    let driver = TerminalDriver::new(mode)?;
    let mut runtime = Runtime::new(driver, addr);

    if let Some(username) = &args.username {
        runtime.app_mut().prefill_username(username);
        runtime.handle_event(AppEvent::Key(KeyInput::Enter)).await?;
    }

    Ok(runtime.run().await?)
}
