//! roundabout
//!
//! A concurrent reverse-proxy load balancer built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────┐
//!     ────────────────────────┼─▶ server (axum) ──▶ proxy pipeline       │
//!                             │                        │                 │
//!                             │                        ▼                 │
//!                             │        registry ──▶ balancer (policy)    │
//!                             │           ▲            │                 │
//!                             │           │            ▼                 │
//!     Client Response         │        health       forward + annotate ──┼──▶ Backend
//!     ◀───────────────────────┼─        monitor                          │
//!                             │                                          │
//!                             │  config · lifecycle · observability      │
//!                             └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roundabout::config;
use roundabout::lifecycle::{self, Shutdown};
use roundabout::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "roundabout", version, about = "Concurrent reverse-proxy load balancer")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = config::load_config(&args.config)?;

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "roundabout={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        config_file = %args.config.display(),
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    // Translate OS signals into the shutdown broadcast
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    // Create and run the server
    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
