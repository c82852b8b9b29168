//! # Inbound Ports
//!
//! API traits defining what the custody subsystem can do.

use crate::domain::{
    Amount, AssetId, ChainId, CustodyResult, Holding, Principal, TransferId, TransferRecord,
};

/// Owner/asset balance store.
pub trait CustodyLedgerApi: Send + Sync {
    /// Pull funds into custody and credit `owner`'s holding.
    fn deposit(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> CustodyResult<Amount>;

    /// Debit `owner`'s holding and pay the funds out.
    fn withdraw(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> CustodyResult<Amount>;

    /// Current holding (zero if none).
    fn get_balance(&self, owner: &Principal, asset: &AssetId) -> Amount;

    /// All holdings of `owner`, ordered by asset.
    fn get_holdings(&self, owner: &Principal) -> Vec<Holding>;
}

/// Two-phase cross-chain transfer lifecycle.
pub trait TransferCoordinatorApi: Send + Sync {
    /// Escrow funds and record an `Initiated` transfer.
    fn initiate_transfer(
        &self,
        sender: &Principal,
        asset: &AssetId,
        amount: Amount,
        target_chain: ChainId,
        target_address: &Principal,
    ) -> CustodyResult<TransferId>;

    /// Relayer acknowledgment. Owner-gated.
    fn complete_transfer(&self, caller: &Principal, transfer_id: &TransferId) -> CustodyResult<()>;

    /// Look up a transfer.
    fn get_transfer(&self, transfer_id: &TransferId) -> CustodyResult<TransferRecord>;
}

/// Destination-chain whitelist administration. Owner-gated mutations.
pub trait ChainRegistryApi: Send + Sync {
    /// Add a chain. Idempotent.
    fn add_supported_chain(&self, caller: &Principal, chain_id: ChainId) -> CustodyResult<()>;

    /// Remove a chain for future transfers.
    fn remove_supported_chain(&self, caller: &Principal, chain_id: ChainId) -> CustodyResult<()>;

    /// Whether a chain accepts new transfers.
    fn is_supported(&self, chain_id: ChainId) -> bool;
}
