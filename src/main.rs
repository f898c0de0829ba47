//! CORS relay.
//!
//! ```text
//!   Browser ──GET /?url=<encoded origin URL>──▶ relay ──GET──▶ Origin
//!   Browser ◀── origin status, content headers, ── relay ◀──── Origin
//!               CORS + security headers,
//!               streamed body
//! ```
//!
//! Usage: `cors-relay [--config relay.toml] [--bind 127.0.0.1:8080]`

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, validation::validate_config, ConfigError, RelayConfig};
use cors_relay::lifecycle::{shutdown_signal, Shutdown};
use cors_relay::observability::init_tracing;
use cors_relay::RelayServer;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(
    about = "Relay GET/HEAD requests to any http(s) origin with CORS headers",
    long_about = None
)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_tracing(&config.observability);

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_redirects = config.upstream.max_redirects,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = RelayServer::new(config)?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
