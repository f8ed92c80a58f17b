//! Region edge (v1)
//!
//! Keeps a visitor inside the region their referrer carried.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                   REGION EDGE                    │
//!                     │                                                  │
//!   Client Request    │  ┌─────────┐    ┌───────────┐    ┌───────────┐  │
//!   ──────────────────┼─▶│  http   │───▶│  routing  │───▶│ decision  │  │
//!   Host + Referer    │  │ server  │    │  facets   │    │           │  │
//!                     │  └─────────┘    └───────────┘    └─────┬─────┘  │
//!                     │                                        │        │
//!                     │              ┌─────────────────────────┴──┐     │
//!                     │              ▼                            ▼     │
//!   Client Response   │  ┌──────────────────┐          ┌──────────────┐ │
//!   ◀─────────────────┼──│ 307 + Location   │          │ region page  │ │
//!                     │  │ (rewrite.rs)     │          │ (page.rs)    │ │
//!                     │  └──────────────────┘          └──────────────┘ │
//!                     │                                                  │
//!                     │  config (TOML + hot reload) · observability      │
//!                     │  admin API · lifecycle (signals, shutdown)       │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use region_edge::config::{load_config, ConfigWatcher, EdgeConfig};
use region_edge::lifecycle::{signals, Shutdown};
use region_edge::observability::{logging, metrics};
use region_edge::EdgeServer;

#[derive(Parser)]
#[command(name = "region-edge")]
#[command(about = "Region-consistent HTTP edge", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("region-edge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        suffix_labels = config.hosts.suffix_labels,
        regions = ?config.page.regions,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher handle alive for the lifetime of the server.
    let (config_updates, _watcher) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = EdgeServer::new(config);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
