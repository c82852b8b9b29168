//! # Custody Events
//!
//! Append-only, ordered notifications consumed by off-core collaborators
//! (relayer, analytics, compliance). Emitted only after the triggering
//! operation has fully applied.

use super::value_objects::{Amount, AssetId, ChainId, Principal, Timestamp, TransferId};
use serde::{Deserialize, Serialize};

/// Event topic for subscription filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Deposits and withdrawals.
    Ledger,
    /// Transfer lifecycle.
    Transfer,
    /// Access-control changes.
    Admin,
}

/// Event emitted by the custody service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyEvent {
    /// Funds credited to a holding.
    Deposited {
        /// Holding owner
        owner: Principal,
        /// Asset
        asset: AssetId,
        /// Amount credited
        amount: Amount,
        /// When it was applied
        timestamp: Timestamp,
    },

    /// Funds paid out of a holding.
    Withdrawn {
        /// Holding owner
        owner: Principal,
        /// Asset
        asset: AssetId,
        /// Amount paid out
        amount: Amount,
        /// When it was applied
        timestamp: Timestamp,
    },

    /// Funds escrowed for a cross-chain transfer. Carries everything a
    /// relayer needs to execute the destination-side credit.
    TransferInitiated {
        /// Transfer id
        transfer_id: TransferId,
        /// Sender on this ledger
        sender: Principal,
        /// Asset
        asset: AssetId,
        /// Amount escrowed
        amount: Amount,
        /// Destination network
        target_chain: ChainId,
        /// Destination recipient
        target_address: Principal,
    },

    /// Relayer acknowledged the destination-side credit.
    TransferCompleted {
        /// Transfer id
        transfer_id: TransferId,
    },

    /// Access-control owner changed.
    OwnershipTransferred {
        /// Previous owner
        previous: Principal,
        /// New owner
        new_owner: Principal,
    },
}

impl CustodyEvent {
    /// Topic of this event.
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Deposited { .. } | Self::Withdrawn { .. } => EventTopic::Ledger,
            Self::TransferInitiated { .. } | Self::TransferCompleted { .. } => EventTopic::Transfer,
            Self::OwnershipTransferred { .. } => EventTopic::Admin,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "Deposited",
            Self::Withdrawn { .. } => "Withdrawn",
            Self::TransferInitiated { .. } => "TransferInitiated",
            Self::TransferCompleted { .. } => "TransferCompleted",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// Transfer id, for transfer events.
    pub fn transfer_id(&self) -> Option<TransferId> {
        match self {
            Self::TransferInitiated { transfer_id, .. }
            | Self::TransferCompleted { transfer_id } => Some(*transfer_id),
            _ => None,
        }
    }
}
