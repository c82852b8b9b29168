//! Configuration for the custody service.

use crate::domain::{ChainId, Principal};
use serde::{Deserialize, Serialize};

/// Default capacity of the broadcast event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Custody service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// Access-control owner (admin and relayer acknowledgments).
    pub owner: Principal,
    /// Chains supported from construction.
    pub supported_chains: Vec<ChainId>,
    /// Per-subscriber buffer of the broadcast event sink.
    pub event_channel_capacity: usize,
}

impl CustodyConfig {
    /// Config with `owner` and no supported chains.
    pub fn with_owner(owner: Principal) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            owner: Principal::new("admin"),
            supported_chains: Vec::new(),
            event_channel_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
