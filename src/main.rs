//! peer-relay - Main entry point
//!
//! Room-based signaling relay for peer-to-peer audio/video calls.

use clap::Parser;
use log::{error, info, warn};
use peer_relay::args::Args;
use peer_relay::{run_http_server, Config, Metrics, SharedState, SignalingRouter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    let loaded = args.load_config();

    // Initialize logging: env filter wins, then --verbose, then config level
    let log_level = match (&loaded, args.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(cfg), false) => cfg.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    env_logger::Builder::new()
        .parse_filters(&std::env::var("PEER_RELAY_LOG").unwrap_or(log_level))
        .init();

    info!("peer-relay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(cfg) => {
            info!("Loaded configuration from {:?}", args.config);
            cfg
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };

    args.apply_overrides(&mut config, std::env::var("PORT").ok().as_deref());

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let metrics = Arc::new(Metrics::new()?);
    let (router, router_task) = SignalingRouter::new(metrics.clone()).spawn();

    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    let state = Arc::new(SharedState::new(config, router, metrics));
    let shutdown = async {
        let _ = signal::ctrl_c().await;
        info!("Shutdown signal received");
    };

    if let Err(e) = run_http_server(listener, state, shutdown).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    router_task.abort();
    info!("peer-relay stopped");
    Ok(())
}
