//! # Domain Errors
//!
//! Error taxonomy for custody and cross-chain transfer operations.
//!
//! Every error is synchronous and leaves state exactly as it was before the
//! failing call.

use super::value_objects::{Amount, AssetId, ChainId, Principal, TransferId};
use thiserror::Error;

/// Result alias used by every service entry point.
pub type CustodyResult<T> = Result<T, CustodyError>;

/// Input rejected before any state is touched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Amount was zero.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Destination chain is not in the registry.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(ChainId),

    /// Checked arithmetic overflowed.
    #[error("amount overflow")]
    AmountOverflow,

    /// Derived transfer id already exists.
    #[error("duplicate transfer id: {0}")]
    DuplicateTransferId(TransferId),

    /// An opaque identifier was empty.
    #[error("empty identifier: {0}")]
    EmptyIdentifier(&'static str),
}

/// Failure reported by the external asset-transfer mechanism.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VaultError {
    /// Caller's external balance cannot cover the pull.
    #[error("external balance too low: available={available}, requested={requested}")]
    InsufficientFunds {
        /// External balance at the time of the pull
        available: Amount,
        /// Requested amount
        requested: Amount,
    },

    /// Transfer was refused by the mechanism.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Custody error types.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// Invalid input.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Caller is not the access-control owner.
    #[error("unauthorized caller: {caller}")]
    Unauthorized {
        /// Principal that attempted the call
        caller: Principal,
    },

    /// Holding cannot cover a withdrawal or escrow debit.
    #[error(
        "insufficient balance for {owner}/{asset}: available={available}, requested={requested}"
    )]
    InsufficientBalance {
        /// Holding owner
        owner: Principal,
        /// Asset
        asset: AssetId,
        /// Current holding
        available: Amount,
        /// Requested amount
        requested: Amount,
    },

    /// A guarded entry point was re-entered while another was in flight.
    #[error("reentrant call rejected: {operation}")]
    Reentrancy {
        /// Operation that was refused
        operation: &'static str,
    },

    /// Unknown transfer id.
    #[error("transfer not found: {0}")]
    TransferNotFound(TransferId),

    /// Transfer was already completed.
    #[error("transfer already completed: {0}")]
    DuplicateCompletion(TransferId),

    /// External pull or payout failed; the operation was rolled back.
    #[error("vault transfer failed: {0}")]
    Vault(#[from] VaultError),
}

/// Stable classification of [`CustodyError`] for metrics labels and callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CustodyError::Validation`].
    Validation,
    /// See [`CustodyError::Unauthorized`].
    Authorization,
    /// See [`CustodyError::InsufficientBalance`].
    InsufficientBalance,
    /// See [`CustodyError::Reentrancy`].
    Reentrancy,
    /// See [`CustodyError::TransferNotFound`].
    NotFound,
    /// See [`CustodyError::DuplicateCompletion`].
    DuplicateCompletion,
    /// See [`CustodyError::Vault`].
    ExternalTransfer,
}

impl ErrorKind {
    /// Label used in metrics and structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::InsufficientBalance => "insufficient_balance",
            Self::Reentrancy => "reentrancy",
            Self::NotFound => "not_found",
            Self::DuplicateCompletion => "duplicate_completion",
            Self::ExternalTransfer => "external_transfer",
        }
    }
}

impl CustodyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::Reentrancy { .. } => ErrorKind::Reentrancy,
            Self::TransferNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCompletion(_) => ErrorKind::DuplicateCompletion,
            Self::Vault(_) => ErrorKind::ExternalTransfer,
        }
    }

    /// `true` for errors callers should treat as an idempotent no-op.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::DuplicateCompletion(_))
    }
}
