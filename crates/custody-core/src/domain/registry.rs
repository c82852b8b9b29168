//! # Chain Registry
//!
//! Whitelist of destination networks eligible for new transfers.
//! Authorization is enforced by the service before these methods run.

use super::entities::ChainEntry;
use super::value_objects::{ChainId, Timestamp};
use std::collections::BTreeMap;

/// Destination-chain whitelist.
#[derive(Clone, Debug, Default)]
pub struct ChainRegistry {
    entries: BTreeMap<ChainId, ChainEntry>,
}

impl ChainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a chain as supported. Returns `false` if it already was.
    pub fn add(&mut self, chain_id: ChainId, now: Timestamp) -> bool {
        match self.entries.get_mut(&chain_id) {
            Some(entry) if entry.supported => false,
            Some(entry) => {
                entry.supported = true;
                entry.updated_at = now;
                true
            }
            None => {
                self.entries.insert(
                    chain_id,
                    ChainEntry {
                        chain_id,
                        supported: true,
                        updated_at: now,
                    },
                );
                true
            }
        }
    }

    /// Mark a chain as unsupported. Returns `false` if it was not supported.
    ///
    /// Only future transfers are affected; the entry itself is kept.
    pub fn remove(&mut self, chain_id: ChainId, now: Timestamp) -> bool {
        match self.entries.get_mut(&chain_id) {
            Some(entry) if entry.supported => {
                entry.supported = false;
                entry.updated_at = now;
                true
            }
            _ => false,
        }
    }

    /// Whether new transfers may target this chain.
    pub fn is_supported(&self, chain_id: ChainId) -> bool {
        self.entries
            .get(&chain_id)
            .map(|entry| entry.supported)
            .unwrap_or(false)
    }

    /// Registry entry, including disabled chains.
    pub fn entry(&self, chain_id: ChainId) -> Option<&ChainEntry> {
        self.entries.get(&chain_id)
    }

    /// Currently supported chains, ascending.
    pub fn supported(&self) -> Vec<ChainId> {
        self.entries
            .values()
            .filter(|entry| entry.supported)
            .map(|entry| entry.chain_id)
            .collect()
    }
}
