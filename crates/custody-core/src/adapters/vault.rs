//! In-memory asset vault.
//!
//! Tracks external (out-of-custody) balances per principal and asset. A pull
//! debits the external balance; a push credits it. Each call is atomic.

use crate::domain::{Amount, AssetId, Principal, VaultError};
use crate::ports::outbound::AssetVault;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Asset vault backed by a map of external balances.
#[derive(Default)]
pub struct InMemoryVault {
    balances: Mutex<HashMap<(Principal, AssetId), Amount>>,
    fail_pull: Mutex<Option<String>>,
    fail_push: Mutex<Option<String>>,
}

impl InMemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `owner`'s external balance.
    pub fn fund(&self, owner: &Principal, asset: &AssetId, amount: Amount) {
        let mut balances = self.balances.lock();
        let entry = balances.entry((owner.clone(), asset.clone())).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// External balance of `owner` in `asset`.
    pub fn external_balance(&self, owner: &Principal, asset: &AssetId) -> Amount {
        self.balances
            .lock()
            .get(&(owner.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Reject the next pull with `reason`.
    pub fn fail_next_pull(&self, reason: &str) {
        *self.fail_pull.lock() = Some(reason.to_string());
    }

    /// Reject the next push with `reason`.
    pub fn fail_next_push(&self, reason: &str) {
        *self.fail_push.lock() = Some(reason.to_string());
    }
}

impl AssetVault for InMemoryVault {
    fn pull(&self, from: &Principal, asset: &AssetId, amount: Amount) -> Result<(), VaultError> {
        if let Some(reason) = self.fail_pull.lock().take() {
            return Err(VaultError::Rejected(reason));
        }

        let mut balances = self.balances.lock();
        let key = (from.clone(), asset.clone());
        let available = balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(VaultError::InsufficientFunds {
                available,
                requested: amount,
            });
        }
        balances.insert(key, available - amount);
        debug!(from = %from, asset = %asset, amount, "[vault] pulled");
        Ok(())
    }

    fn push(&self, to: &Principal, asset: &AssetId, amount: Amount) -> Result<(), VaultError> {
        if let Some(reason) = self.fail_push.lock().take() {
            return Err(VaultError::Rejected(reason));
        }

        let mut balances = self.balances.lock();
        let entry = balances.entry((to.clone(), asset.clone())).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| VaultError::Rejected("external balance overflow".into()))?;
        debug!(to = %to, asset = %asset, amount, "[vault] pushed");
        Ok(())
    }
}
