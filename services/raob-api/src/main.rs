//! RAOB Tool Server
//!
//! Station lookup, convective indices and sounding plots over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use raob_api::build_router;
use raob_api::config::{
    default_listen_addr, UpstreamConfig, DEFAULT_SOUNDING_URL, DEFAULT_STATION_URL,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use raob_api::state::AppState;
use storage::ObjectStorageConfig;

/// RAOB Tool Server
#[derive(Parser, Debug)]
#[command(name = "raob-api")]
#[command(about = "Radiosonde sounding tools: station lookup, indices, Skew-T and hodograph plots")]
struct Args {
    /// Listen address (defaults to 0.0.0.0 on $PORT, or 8000)
    #[arg(short, long, env = "RAOB_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "RAOB_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Station directory URL
    #[arg(long, default_value = DEFAULT_STATION_URL, env = "RAOB_STATION_URL")]
    station_url: String,

    /// Sounding archive URL
    #[arg(long, default_value = DEFAULT_SOUNDING_URL, env = "RAOB_SOUNDING_URL")]
    sounding_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS, env = "RAOB_UPSTREAM_TIMEOUT_SECS")]
    upstream_timeout_secs: u64,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting RAOB tool server");

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
            None
        }
    };

    let upstream = UpstreamConfig {
        station_url: args.station_url,
        sounding_url: args.sounding_url,
        timeout: Duration::from_secs(args.upstream_timeout_secs),
    };
    let storage = ObjectStorageConfig::from_env();

    let state = Arc::new(AppState::from_config(upstream, storage, metrics)?);
    info!(
        publishing = state.tools.publishing_enabled(),
        "Application state initialized"
    );

    let app = build_router(state);

    let listen = args
        .listen
        .unwrap_or_else(|| default_listen_addr(std::env::var("PORT").ok().as_deref()));
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", listen))?;

    info!("RAOB tool server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
