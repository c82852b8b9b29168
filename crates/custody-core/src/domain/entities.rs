//! # Domain Entities
//!
//! Holdings, transfer records, registry entries and the movement journal.

use super::errors::{CustodyError, CustodyResult};
use super::value_objects::{
    Amount, AssetId, ChainId, Principal, Timestamp, TransferId, TransferStatus,
};
use serde::{Deserialize, Serialize};

/// Ledger-tracked balance of one asset for one owner.
///
/// Created on first deposit and never deleted; may reach zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Owner principal.
    pub owner: Principal,
    /// Asset held.
    pub asset: AssetId,
    /// Current amount.
    pub amount: Amount,
    /// Timestamp of the last mutation.
    pub last_updated: Timestamp,
}

impl Holding {
    /// Create an empty holding.
    pub fn empty(owner: Principal, asset: AssetId, now: Timestamp) -> Self {
        Self {
            owner,
            asset,
            amount: 0,
            last_updated: now,
        }
    }
}

/// Parameters for creating a transfer record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferParams {
    /// Derived transfer id.
    pub id: TransferId,
    /// Sender whose holding was escrowed.
    pub sender: Principal,
    /// Asset transferred.
    pub asset: AssetId,
    /// Amount escrowed.
    pub amount: Amount,
    /// Destination network.
    pub target_chain: ChainId,
    /// Recipient on the destination network.
    pub target_address: Principal,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Sequence number mixed into the id.
    pub sequence: u64,
}

/// Lifecycle record of one cross-chain transfer.
///
/// Immutable apart from the one-way `Initiated -> Completed` transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique id.
    pub id: TransferId,
    /// Sender.
    pub sender: Principal,
    /// Asset.
    pub asset: AssetId,
    /// Amount.
    pub amount: Amount,
    /// Destination network.
    pub target_chain: ChainId,
    /// Destination recipient.
    pub target_address: Principal,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Current status.
    pub status: TransferStatus,
    /// Set once the relayer acknowledged.
    pub completed_at: Option<Timestamp>,
    /// Sequence number mixed into the id.
    pub sequence: u64,
}

impl TransferRecord {
    /// Create a new record in `Initiated` state.
    pub fn new(params: TransferParams) -> Self {
        Self {
            id: params.id,
            sender: params.sender,
            asset: params.asset,
            amount: params.amount,
            target_chain: params.target_chain,
            target_address: params.target_address,
            created_at: params.created_at,
            status: TransferStatus::Initiated,
            completed_at: None,
            sequence: params.sequence,
        }
    }

    /// Mark completed. Fails if already completed.
    pub fn complete(&mut self, now: Timestamp) -> CustodyResult<()> {
        if !self.status.can_transition_to(TransferStatus::Completed) {
            return Err(CustodyError::DuplicateCompletion(self.id));
        }
        self.status = TransferStatus::Completed;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// Registry entry for a destination network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Network key.
    pub chain_id: ChainId,
    /// Eligible for new transfers.
    pub supported: bool,
    /// Timestamp of the last admin change.
    pub updated_at: Timestamp,
}

/// Kind of ledger movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JournalKind {
    /// Funds pulled into custody.
    Deposit,
    /// Funds debited for a payout.
    Withdrawal,
    /// Payout failed; the matching withdrawal is credited back.
    WithdrawalReversed,
    /// Funds locked behind an outbound transfer.
    Escrow,
}

/// Immutable, append-only record of one ledger movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal.
    pub sequence: u64,
    /// Movement kind.
    pub kind: JournalKind,
    /// Holding owner.
    pub owner: Principal,
    /// Asset.
    pub asset: AssetId,
    /// Amount moved.
    pub amount: Amount,
    /// When the movement was applied.
    pub timestamp: Timestamp,
    /// Transfer backed by an escrow movement.
    pub transfer_id: Option<TransferId>,
}
