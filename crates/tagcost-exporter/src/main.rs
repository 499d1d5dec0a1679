//! tagcost exporter - AWS tag cost as Prometheus gauges

mod aws;
mod server;

use std::sync::Arc;
use tagcost_core::ExporterConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExporterConfig::from_env()?;
    info!(
        version = tagcost_core::VERSION,
        dimensions = ?config.dimensions,
        port = config.port,
        "Starting tagcost exporter"
    );

    let source = Arc::new(aws::AwsCostSource::new().await);
    let server = server::MetricsServer::new(Arc::new(config), source);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down..."),
    }

    Ok(())
}
