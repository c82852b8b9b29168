//! # Custody Container
//!
//! Holds the custody service and the adapters it was built with.
//!
//! ## Wiring
//!
//! ```text
//! InMemoryVault ─┐
//! SystemClock ───┼──→ CustodyService ──emit──→ MeteredEventSink ──broadcast──→ relayer
//! NodeConfig ────┘                                                     └──────→ analytics
//! ```

pub mod config;

pub use config::{ConfigError, NodeConfig, RelayerConfig};

use std::sync::Arc;

use custody_core::{CustodyService, InMemoryVault, SystemClock};
use tracing::info;

use crate::adapters::MeteredEventSink;
use crate::relayer::{DestinationExecutor, LoopbackRelayer};

/// Concrete custody service used by the node.
pub type NodeService = CustodyService<InMemoryVault, MeteredEventSink, SystemClock>;

/// Central container holding the service and its adapters.
pub struct CustodyContainer {
    /// Configuration the container was built from.
    pub config: NodeConfig,
    /// The custody service.
    pub service: Arc<NodeService>,
    /// External balances backing deposits and withdrawals.
    pub vault: Arc<InMemoryVault>,
    /// Event fan-out.
    pub events: Arc<MeteredEventSink>,
}

impl CustodyContainer {
    /// Build the service and its adapters from `config`.
    pub fn new(config: NodeConfig) -> Self {
        let vault = Arc::new(InMemoryVault::new());
        let events = Arc::new(MeteredEventSink::new(
            config.custody.event_channel_capacity,
        ));
        let service = Arc::new(CustodyService::new(
            config.custody.clone(),
            Arc::clone(&vault),
            Arc::clone(&events),
            Arc::new(SystemClock),
        ));

        info!(
            owner = %config.custody.owner,
            capacity = config.custody.event_channel_capacity,
            "Custody container initialized"
        );

        Self {
            config,
            service,
            vault,
            events,
        }
    }

    /// Relayer subscribed to this container's events, acknowledging as the
    /// configured owner.
    pub fn relayer<D: DestinationExecutor>(&self, executor: Arc<D>) -> LoopbackRelayer<D> {
        LoopbackRelayer::new(
            Arc::clone(&self.service),
            self.events.subscribe(),
            executor,
            self.config.custody.owner.clone(),
            self.config.relayer.clone(),
        )
    }
}
