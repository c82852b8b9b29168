//! # Custody Node
//!
//! Entry point for the custody node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `CB_*` environment variables
//! 2. Initialize logging and metrics
//! 3. Validate configuration
//! 4. Build the custody container and start the relayer
//! 5. Wait for Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use tracing::info;

use custody_node::{NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;

    custody_telemetry::init_telemetry(&config.telemetry)
        .context("Failed to initialize telemetry")?;

    config.validate().context("Invalid configuration")?;

    let runtime = NodeRuntime::new(config);
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    if let Some(stats) = runtime.shutdown().await {
        info!(
            completed = stats.completed,
            duplicates = stats.duplicates,
            failed = stats.failed,
            "Relayer summary"
        );
    }

    match custody_telemetry::gather_metrics() {
        Ok(metrics) => info!("Final metrics:\n{}", metrics),
        Err(e) => tracing::warn!("Failed to gather metrics: {}", e),
    }

    Ok(())
}
