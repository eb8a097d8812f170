//! portal-relay
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────────────┐
//!     ───────────────────────▶│  http::server (axum + tower-http layers)     │
//!     /api/proxy/<path>       │      │                                       │
//!                             │      ▼                                       │
//!                             │  relay::Relay::forward                       │
//!                             │   target → body → headers → reqwest ─────────┼──▶ Backend
//!                             │   payload → headers ◀────────────────────────┼─── origin
//!     ◀───────────────────────│                                              │
//!                             │  config · observability · lifecycle          │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use portal_relay::lifecycle::signals::wait_for_termination;
use portal_relay::lifecycle::startup::{resolve_config, Overrides};
use portal_relay::observability::{logging, metrics};
use portal_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "portal-relay")]
#[command(about = "Same-origin HTTP relay to a fixed backend API", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Backend origin, overrides `backend.origin`.
    #[arg(long, env = "RELAY_BACKEND_ORIGIN")]
    backend_origin: Option<String>,

    /// Bind address, overrides `listener.bind_address`.
    #[arg(long, env = "RELAY_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        Overrides {
            backend_origin: cli.backend_origin,
            bind_address: cli.bind,
        },
    )?;

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        backend_origin = %config.backend.origin,
        "portal-relay starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on(wait_for_termination());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
