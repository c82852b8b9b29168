//! # Transfer-Id Derivation
//!
//! `id = SHA-256(sender, asset, amount, target_chain, target_address, timestamp, sequence)`.
//!
//! Variable-length fields are length-prefixed so distinct inputs cannot
//! produce the same preimage. The sequence number makes ids unique even for
//! identical requests issued within the same second.

use crate::domain::{Amount, AssetId, ChainId, Principal, Timestamp, TransferId};
use sha2::{Digest, Sha256};

/// Domain separator for transfer ids.
const TRANSFER_ID_DOMAIN: &[u8] = b"custody-bridge/transfer/v1";

/// Inputs to [`derive_transfer_id`].
#[derive(Clone, Copy, Debug)]
pub struct TransferIdInput<'a> {
    /// Sender principal.
    pub sender: &'a Principal,
    /// Asset.
    pub asset: &'a AssetId,
    /// Amount.
    pub amount: Amount,
    /// Destination network.
    pub target_chain: ChainId,
    /// Destination recipient.
    pub target_address: &'a Principal,
    /// Creation timestamp.
    pub timestamp: Timestamp,
    /// Monotonic sequence number.
    pub sequence: u64,
}

fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Derive the transfer id.
pub fn derive_transfer_id(input: TransferIdInput<'_>) -> TransferId {
    let mut hasher = Sha256::new();
    hasher.update(TRANSFER_ID_DOMAIN);
    update_prefixed(&mut hasher, input.sender.as_str().as_bytes());
    update_prefixed(&mut hasher, input.asset.as_str().as_bytes());
    hasher.update(input.amount.to_be_bytes());
    hasher.update(input.target_chain.0.to_be_bytes());
    update_prefixed(&mut hasher, input.target_address.as_str().as_bytes());
    hasher.update(input.timestamp.to_be_bytes());
    hasher.update(input.sequence.to_be_bytes());

    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    TransferId(id)
}
