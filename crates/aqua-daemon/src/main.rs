//! aquad: the AquaKeeper daemon.
//!
//! Single OS process running a Tokio async runtime. Clients talk to the
//! daemon via JSON-RPC over a Unix socket in the data directory.

mod commands;
mod config;
mod rpc;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AdvancedConfig, DaemonConfig};
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    pub fn new(
        conn: rusqlite::Connection,
        config: DaemonConfig,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            shutdown_tx,
        }
    }
}

fn init_tracing(advanced: &AdvancedConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("aqua={}", advanced.log_level).parse()?);

    if advanced.log_file.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&advanced.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config (log level lives there)
    let config = DaemonConfig::load()?;
    init_tracing(&config.advanced)?;

    info!("AquaKeeper daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open database
    let db_path = config.db_path();
    let conn = aqua_db::open(&db_path)?;
    info!("Database ready at {:?}", db_path);

    // 3. Shutdown channel
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

    // 4. Build daemon state
    let socket_path = config.socket_path();
    let state = Arc::new(DaemonState::new(conn, config, shutdown_tx.clone()));

    // 5. Start IPC server
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());
    info!("Starting JSON-RPC server on {:?}", socket_path);

    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown requested");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    info!("Daemon shutting down gracefully");

    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}
