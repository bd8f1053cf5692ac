//! Edge host binary.
//!
//! ```text
//!     Viewer Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ request id ─▶ viewer-request fn ──┐        │
//!                              │                    │ 403            ▼        │
//!                              │                    │           origin fetch ─┼──▶ Origin
//!     Viewer Response          │                    ▼                │        │
//!     ◀────────────────────────┼── trace ◀── viewer-response fn ◀────┘        │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_cache_control::config::{load_config, EdgeConfig};
use edge_cache_control::lifecycle::{signals, Shutdown};
use edge_cache_control::observability::logging;
use edge_cache_control::EdgeServer;

#[derive(Parser)]
#[command(name = "edge-cache-control")]
#[command(about = "Run the cache-control edge functions in front of an origin", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        origin = %config.origin.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = EdgeServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.listener();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
