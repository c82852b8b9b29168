//! # Node Runtime
//!
//! Owns the container, the relayer task and the shutdown signal.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::container::{CustodyContainer, NodeConfig};
use crate::relayer::{DestinationExecutor, LoggingDestination, RelayerStats};

/// The custody node: service, adapters and background tasks.
pub struct NodeRuntime {
    /// Container with the service and its adapters.
    container: Arc<CustodyContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Relayer task, if started.
    relayer: Mutex<Option<JoinHandle<RelayerStats>>>,
}

impl NodeRuntime {
    /// Create a runtime from a validated configuration.
    pub fn new(config: NodeConfig) -> Self {
        info!("Creating custody node runtime");
        let container = Arc::new(CustodyContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            shutdown_tx,
            shutdown_rx,
            relayer: Mutex::new(None),
        }
    }

    /// Start background tasks with the logging destination.
    pub fn start(&self) {
        self.start_with(Arc::new(LoggingDestination));
    }

    /// Start background tasks with a custom destination executor.
    pub fn start_with<D: DestinationExecutor>(&self, executor: Arc<D>) {
        let config = &self.container.config;
        info!("===========================================");
        info!("  Custody Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(
            "Supported chains: {:?}",
            self.container.service.supported_chains()
        );

        if !config.relayer.enabled {
            info!("Relayer disabled; transfers wait for an external acknowledgment");
            return;
        }

        let relayer = self.container.relayer(executor);
        let shutdown = self.shutdown_rx.clone();
        let handle = tokio::spawn(relayer.run(shutdown));
        *self.relayer.lock() = Some(handle);
        info!(
            ack_delay_ms = config.relayer.ack_delay_ms,
            "Relayer started"
        );
    }

    /// Signal shutdown and wait for the relayer to stop.
    pub async fn shutdown(&self) -> Option<RelayerStats> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handle = self.relayer.lock().take();
        let stats = match handle {
            Some(handle) => match handle.await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    error!("Relayer task failed: {}", e);
                    None
                }
            },
            None => None,
        };

        info!("Shutdown complete");
        stats
    }

    /// Get a reference to the container.
    pub fn container(&self) -> Arc<CustodyContainer> {
        Arc::clone(&self.container)
    }
}
