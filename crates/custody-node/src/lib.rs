//! # Custody Node Library
//!
//! Runtime pieces of the custody node, exposed for the binary and for tests.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and wiring of the custody service
//! - `adapters/` - Metered event sink
//! - `relayer` - In-process relayer acknowledging initiated transfers
//! - `runtime` - Task lifecycle and graceful shutdown

#![warn(missing_docs)]

pub mod adapters;
pub mod container;
pub mod relayer;
pub mod runtime;

pub use container::{ConfigError, CustodyContainer, NodeConfig, NodeService, RelayerConfig};
pub use relayer::{
    DeliveryError, DestinationExecutor, LoggingDestination, LoopbackRelayer, RelayerStats,
};
pub use runtime::NodeRuntime;
