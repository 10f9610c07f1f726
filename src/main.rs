//! API Gateway
//!
//! A single ingress point in front of the shop's backend services.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                  GATEWAY                     │
//!   Client Request    │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│  http  │──▶│  routing   │──▶│   auth   │──┼──▶ Auth Service
//!                     │  │ server │   │ RouteTable │   │   gate   │  │   (gated routes)
//!                     │  └────────┘   └────────────┘   └────┬─────┘  │
//!                     │                                     ▼        │
//!   Client Response   │  ┌────────┐                  ┌──────────┐    │
//!   ◀─────────────────┼──│relay / │◀─────────────────│  proxy   │◀───┼──▶ Backend
//!                     │  │ error  │   streamed body  │forwarder │    │
//!                     │  └────────┘                  └──────────┘    │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use api_gateway::observability::logging;
use api_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "HTTP edge gateway: prefix routing, auth gating, streaming proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability);

    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        auth_url = %config.auth.validate_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
