//! # Custody Store
//!
//! All mutable state of one service instance: holdings, the movement
//! journal, transfer records, the chain registry and per-asset custody
//! totals. Owned exclusively by [`crate::service::CustodyService`].
//!
//! Every mutator validates before it writes, so a returned error means
//! nothing changed.

use crate::domain::{
    check_custody_balance, check_solvency, Amount, AssetId, ChainRegistry, CustodyError,
    CustodyResult, Holding, InvariantViolation, JournalEntry, JournalKind, Principal, Timestamp,
    TransferId, TransferRecord, TransferStatus, ValidationError,
};
use std::collections::{BTreeMap, HashMap};

/// Undo information for a debit that is awaiting an external payout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDebit {
    /// Holding owner.
    pub owner: Principal,
    /// Asset.
    pub asset: AssetId,
    /// Amount debited.
    pub amount: Amount,
    /// `last_updated` before the debit.
    pub previous_update: Timestamp,
}

/// Ledger state.
#[derive(Debug, Default)]
pub struct CustodyStore {
    holdings: BTreeMap<(Principal, AssetId), Holding>,
    journal: Vec<JournalEntry>,
    transfers: HashMap<TransferId, TransferRecord>,
    registry: ChainRegistry,
    custody: HashMap<AssetId, Amount>,
    escrowed: HashMap<AssetId, Amount>,
    transfer_sequence: u64,
}

impl CustodyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Holding amount, zero if absent.
    pub fn balance(&self, owner: &Principal, asset: &AssetId) -> Amount {
        self.holdings
            .get(&(owner.clone(), asset.clone()))
            .map(|h| h.amount)
            .unwrap_or(0)
    }

    /// All holdings of `owner`, ordered by asset.
    pub fn holdings_of(&self, owner: &Principal) -> Vec<Holding> {
        self.holdings
            .range((owner.clone(), AssetId::new(""))..)
            .take_while(|((o, _), _)| o == owner)
            .map(|(_, h)| h.clone())
            .collect()
    }

    /// Journal entries of `owner`, oldest first.
    pub fn journal_of(&self, owner: &Principal) -> Vec<JournalEntry> {
        self.journal
            .iter()
            .filter(|e| &e.owner == owner)
            .cloned()
            .collect()
    }

    /// Full journal.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Transfer record by id.
    pub fn transfer(&self, id: &TransferId) -> Option<&TransferRecord> {
        self.transfers.get(id)
    }

    /// Transfers in `status`, ordered by creation sequence.
    pub fn transfers_by_status(&self, status: TransferStatus) -> Vec<TransferRecord> {
        let mut records: Vec<_> = self
            .transfers
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.sequence);
        records
    }

    /// Number of transfer records.
    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Chain registry.
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Mutable chain registry.
    pub fn registry_mut(&mut self) -> &mut ChainRegistry {
        &mut self.registry
    }

    /// Units of `asset` under custody.
    pub fn custody_total(&self, asset: &AssetId) -> Amount {
        self.custody.get(asset).copied().unwrap_or(0)
    }

    /// Units of `asset` locked behind transfers.
    pub fn escrowed(&self, asset: &AssetId) -> Amount {
        self.escrowed.get(asset).copied().unwrap_or(0)
    }

    /// Check solvency and custody-balance invariants.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        check_solvency(self.holdings.values(), &self.journal)?;
        check_custody_balance(self.holdings.values(), &self.escrowed, &self.custody)
    }

    // -------------------------------------------------------------------------
    // Ledger mutations
    // -------------------------------------------------------------------------

    /// Fail if crediting `amount` would overflow the holding or custody total.
    pub fn check_credit(
        &self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> CustodyResult<()> {
        let holding = self.balance(owner, asset);
        holding
            .checked_add(amount)
            .and_then(|_| self.custody_total(asset).checked_add(amount))
            .map(|_| ())
            .ok_or(CustodyError::Validation(ValidationError::AmountOverflow))
    }

    /// Credit a confirmed deposit and journal it. Returns the new holding.
    pub fn apply_deposit(
        &mut self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
        now: Timestamp,
    ) -> CustodyResult<Amount> {
        self.check_credit(owner, asset, amount)?;

        let holding = self
            .holdings
            .entry((owner.clone(), asset.clone()))
            .or_insert_with(|| Holding::empty(owner.clone(), asset.clone(), now));
        holding.amount += amount;
        holding.last_updated = now;
        let balance = holding.amount;

        *self.custody.entry(asset.clone()).or_insert(0) += amount;
        self.append_journal(JournalKind::Deposit, owner, asset, amount, now, None);
        Ok(balance)
    }

    /// Debit and journal a holding ahead of an external payout.
    ///
    /// The custody total drops with the holding, so the ledger is consistent
    /// while the payout is in flight. Call [`Self::rollback_withdrawal`] if
    /// the payout failed.
    pub fn begin_withdrawal(
        &mut self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
        now: Timestamp,
    ) -> CustodyResult<(Amount, PendingDebit)> {
        let previous_update = self.debit_holding(owner, asset, amount, now)?;
        if let Some(total) = self.custody.get_mut(asset) {
            *total -= amount;
        }
        self.append_journal(JournalKind::Withdrawal, owner, asset, amount, now, None);
        let pending = PendingDebit {
            owner: owner.clone(),
            asset: asset.clone(),
            amount,
            previous_update,
        };
        Ok((self.balance(owner, asset), pending))
    }

    /// Restore a holding whose payout failed and journal the reversal.
    pub fn rollback_withdrawal(&mut self, pending: PendingDebit, now: Timestamp) {
        if let Some(holding) = self
            .holdings
            .get_mut(&(pending.owner.clone(), pending.asset.clone()))
        {
            holding.amount += pending.amount;
            holding.last_updated = pending.previous_update;
        }
        *self.custody.entry(pending.asset.clone()).or_insert(0) += pending.amount;
        self.append_journal(
            JournalKind::WithdrawalReversed,
            &pending.owner,
            &pending.asset,
            pending.amount,
            now,
            None,
        );
    }

    // -------------------------------------------------------------------------
    // Transfer mutations
    // -------------------------------------------------------------------------

    /// Next transfer sequence number. Monotonic; never reused.
    pub fn next_transfer_sequence(&mut self) -> u64 {
        let seq = self.transfer_sequence;
        self.transfer_sequence += 1;
        seq
    }

    /// Check that `owner` can escrow `amount`.
    pub fn check_debit(
        &self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> CustodyResult<()> {
        let available = self.balance(owner, asset);
        if available < amount {
            return Err(CustodyError::InsufficientBalance {
                owner: owner.clone(),
                asset: asset.clone(),
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Lock the sender's funds and store the `Initiated` record.
    ///
    /// The escrowed units stay under custody; they leave the holding and are
    /// counted in the per-asset escrow total instead.
    pub fn apply_escrow(&mut self, record: TransferRecord) -> CustodyResult<()> {
        self.check_debit(&record.sender, &record.asset, record.amount)?;
        if self.transfers.contains_key(&record.id) {
            return Err(ValidationError::DuplicateTransferId(record.id).into());
        }

        self.debit_holding(&record.sender, &record.asset, record.amount, record.created_at)?;
        *self.escrowed.entry(record.asset.clone()).or_insert(0) += record.amount;
        self.append_journal(
            JournalKind::Escrow,
            &record.sender,
            &record.asset,
            record.amount,
            record.created_at,
            Some(record.id),
        );
        self.transfers.insert(record.id, record);
        Ok(())
    }

    /// Move a transfer to `Completed`.
    pub fn complete_transfer(&mut self, id: &TransferId, now: Timestamp) -> CustodyResult<()> {
        self.transfers
            .get_mut(id)
            .ok_or(CustodyError::TransferNotFound(*id))?
            .complete(now)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn debit_holding(
        &mut self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
        now: Timestamp,
    ) -> CustodyResult<Timestamp> {
        self.check_debit(owner, asset, amount)?;
        let holding = self
            .holdings
            .get_mut(&(owner.clone(), asset.clone()))
            .ok_or_else(|| CustodyError::InsufficientBalance {
                owner: owner.clone(),
                asset: asset.clone(),
                available: 0,
                requested: amount,
            })?;
        let previous = holding.last_updated;
        holding.amount -= amount;
        holding.last_updated = now;
        Ok(previous)
    }

    fn append_journal(
        &mut self,
        kind: JournalKind,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
        timestamp: Timestamp,
        transfer_id: Option<TransferId>,
    ) {
        let sequence = self.journal.len() as u64;
        self.journal.push(JournalEntry {
            sequence,
            kind,
            owner: owner.clone(),
            asset: asset.clone(),
            amount,
            timestamp,
            transfer_id,
        });
    }
}
