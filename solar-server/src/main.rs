//! HTTP binary for the solar weather forecast service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Wiring the forecast pipeline into the axum router
//! - Translating pipeline errors into structured HTTP responses

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use solar_core::{Config, ForecastService, OpenMeteoGateway, SolarEnergyEstimator};

mod error;
mod routes;

#[derive(Debug, Parser)]
#[command(name = "solar-server", version, about = "Solar weather forecast API")]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let gateway = OpenMeteoGateway::new(
        config.upstream.base_url.clone(),
        Duration::from_secs(config.upstream.timeout_secs),
    )
    .context("Failed to build upstream gateway")?;

    let estimator = SolarEnergyEstimator::new(config.solar);
    let service = Arc::new(ForecastService::new(Arc::new(gateway), estimator));

    let app = routes::router(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    tracing::info!(addr = %args.bind, "starting solar weather server");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
