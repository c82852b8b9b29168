//! # Domain Invariants
//!
//! Solvency and custody-balance rules, checkable from holdings and the
//! movement journal alone.

use super::entities::{Holding, JournalEntry, JournalKind};
use super::value_objects::{Amount, AssetId, Principal};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// A broken ledger invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Holding disagrees with its journal.
    #[error("holding {owner}/{asset} is {holding}, journal implies {expected}")]
    HoldingMismatch {
        /// Owner
        owner: Principal,
        /// Asset
        asset: AssetId,
        /// Stored holding
        holding: Amount,
        /// deposits - withdrawals - escrow, net of reversals
        expected: i128,
    },

    /// Journal has movements for a holding that does not exist.
    #[error("journal references missing holding {owner}/{asset}")]
    MissingHolding {
        /// Owner
        owner: Principal,
        /// Asset
        asset: AssetId,
    },

    /// Custody total disagrees with holdings plus escrow.
    #[error("custody of {asset} is {custody}, holdings+escrow is {accounted}")]
    CustodyMismatch {
        /// Asset
        asset: AssetId,
        /// Units under custody
        custody: Amount,
        /// Sum of holdings and escrow-locked units
        accounted: Amount,
    },
}

/// Invariant: holding == Σdeposits − Σwithdrawals − Σescrow, per (owner, asset).
///
/// A reversed withdrawal cancels the withdrawal it follows.
pub fn check_solvency<'a>(
    holdings: impl IntoIterator<Item = &'a Holding>,
    journal: &[JournalEntry],
) -> Result<(), InvariantViolation> {
    let mut expected: BTreeMap<(&Principal, &AssetId), i128> = BTreeMap::new();
    for entry in journal {
        let delta = entry.amount as i128;
        let slot = expected.entry((&entry.owner, &entry.asset)).or_insert(0);
        match entry.kind {
            JournalKind::Deposit | JournalKind::WithdrawalReversed => *slot += delta,
            JournalKind::Withdrawal | JournalKind::Escrow => *slot -= delta,
        }
    }

    for holding in holdings {
        let want = expected
            .remove(&(&holding.owner, &holding.asset))
            .unwrap_or(0);
        if holding.amount as i128 != want {
            return Err(InvariantViolation::HoldingMismatch {
                owner: holding.owner.clone(),
                asset: holding.asset.clone(),
                holding: holding.amount,
                expected: want,
            });
        }
    }

    if let Some(((owner, asset), _)) = expected.into_iter().next() {
        return Err(InvariantViolation::MissingHolding {
            owner: owner.clone(),
            asset: asset.clone(),
        });
    }
    Ok(())
}

/// Invariant: custody(asset) == Σholdings(asset) + escrowed(asset).
pub fn check_custody_balance<'a>(
    holdings: impl IntoIterator<Item = &'a Holding>,
    escrowed: &HashMap<AssetId, Amount>,
    custody: &HashMap<AssetId, Amount>,
) -> Result<(), InvariantViolation> {
    let mut accounted: HashMap<&AssetId, Amount> = HashMap::new();
    for holding in holdings {
        *accounted.entry(&holding.asset).or_insert(0) += holding.amount;
    }
    for (asset, locked) in escrowed {
        *accounted.entry(asset).or_insert(0) += *locked;
    }

    for (asset, total) in custody {
        let sum = accounted.remove(asset).unwrap_or(0);
        if sum != *total {
            return Err(InvariantViolation::CustodyMismatch {
                asset: asset.clone(),
                custody: *total,
                accounted: sum,
            });
        }
    }
    if let Some((asset, sum)) = accounted.into_iter().find(|(_, sum)| *sum > 0) {
        return Err(InvariantViolation::CustodyMismatch {
            asset: asset.clone(),
            custody: 0,
            accounted: sum,
        });
    }
    Ok(())
}
