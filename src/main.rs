//! HSTS demo server.
//!
//! Serves `200 OK` on every path with the configured
//! `Strict-Transport-Security` header attached. Meant to sit behind a TLS
//! terminator; browsers ignore the header on plain HTTP.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use hsts_middleware::config::{load_config, AppConfig};
use hsts_middleware::observability::init_logging;
use hsts_middleware::HttpServer;

#[derive(Parser)]
#[command(name = "hsts-middleware")]
#[command(about = "Serve responses carrying a Strict-Transport-Security header", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }

    // The subscriber depends on the loaded config; everything that logs
    // (policy resolution, preload warnings) runs after it is installed.
    init_logging(&config.observability)?;

    tracing::info!(
        path = ?cli.config,
        bind_address = %config.listener.bind_address,
        max_age = config.hsts.max_age,
        include_subdomains = config.hsts.include_subdomains,
        preload = config.hsts.send_preload_directive,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
