//! Custody Service - Core business logic
//!
//! One instance owns one [`CustodyStore`]. Every state-mutating entry point
//! acquires the [`ReentrancyGuard`] first, so mutations are applied one at a
//! time in submission order and a callback from the asset vault can never
//! interleave with the call that triggered it.
//!
//! The store lock is never held across a vault call; reads made from inside
//! a callback see the state as already mutated by the outer call.

mod coordinator;
mod ledger;
mod registry;

use crate::config::CustodyConfig;
use crate::domain::{
    Amount, AssetId, ChainId, CustodyEvent, CustodyResult, InvariantViolation, JournalEntry,
    JournalKind, Principal, TransferRecord, TransferStatus, ValidationError,
};
use crate::ports::outbound::{AssetVault, Clock, EventSink};
use crate::security::{AccessControl, ReentrancyGuard};
use crate::store::CustodyStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Custody ledger, chain registry and transfer coordinator.
pub struct CustodyService<V, E, C>
where
    V: AssetVault,
    E: EventSink,
    C: Clock,
{
    access: AccessControl,
    guard: ReentrancyGuard,
    state: RwLock<CustodyStore>,
    vault: Arc<V>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<V, E, C> CustodyService<V, E, C>
where
    V: AssetVault,
    E: EventSink,
    C: Clock,
{
    /// Create a service seeded from `config`.
    pub fn new(config: CustodyConfig, vault: Arc<V>, events: Arc<E>, clock: Arc<C>) -> Self {
        let now = clock.now();
        let mut store = CustodyStore::new();
        for chain in &config.supported_chains {
            store.registry_mut().add(*chain, now);
        }

        info!(
            owner = %config.owner,
            chains = config.supported_chains.len(),
            "[custody] service initialized"
        );

        Self {
            access: AccessControl::new(config.owner),
            guard: ReentrancyGuard::new(),
            state: RwLock::new(store),
            vault,
            events,
            clock,
        }
    }

    /// Current access-control owner.
    pub fn owner(&self) -> Principal {
        self.access.owner()
    }

    /// Hand the owner role to `new_owner`. Owner-gated.
    pub fn transfer_ownership(
        &self,
        caller: &Principal,
        new_owner: Principal,
    ) -> CustodyResult<()> {
        require_identifier(new_owner.as_str(), "new_owner")?;
        let previous = self.access.transfer(caller, new_owner.clone())?;
        info!(previous = %previous, new_owner = %new_owner, "[custody] ownership transferred");
        self.emit(CustodyEvent::OwnershipTransferred {
            previous,
            new_owner,
        });
        Ok(())
    }

    /// Movement journal of `owner`, oldest first.
    pub fn journal(&self, owner: &Principal) -> Vec<JournalEntry> {
        self.state.read().journal_of(owner)
    }

    /// Deposit records of `owner`, oldest first.
    pub fn deposits_of(&self, owner: &Principal) -> Vec<JournalEntry> {
        self.journal(owner)
            .into_iter()
            .filter(|e| e.kind == JournalKind::Deposit)
            .collect()
    }

    /// Units of `asset` under custody (holdings plus escrow).
    pub fn custody_total(&self, asset: &AssetId) -> Amount {
        self.state.read().custody_total(asset)
    }

    /// Units of `asset` locked behind transfers.
    pub fn escrowed(&self, asset: &AssetId) -> Amount {
        self.state.read().escrowed(asset)
    }

    /// Transfers in `status`, oldest first.
    pub fn transfers_by_status(&self, status: TransferStatus) -> Vec<TransferRecord> {
        self.state.read().transfers_by_status(status)
    }

    /// Supported destination chains, ascending.
    pub fn supported_chains(&self) -> Vec<ChainId> {
        self.state.read().registry().supported()
    }

    /// Check solvency and custody-balance invariants.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        self.state.read().verify()
    }

    fn emit(&self, event: CustodyEvent) {
        debug!(event = event.name(), "[custody] emitting event");
        self.events.emit(event);
    }
}

fn require_positive(amount: Amount) -> CustodyResult<()> {
    if amount == 0 {
        return Err(ValidationError::NonPositiveAmount.into());
    }
    Ok(())
}

fn require_identifier(value: &str, field: &'static str) -> CustodyResult<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyIdentifier(field).into());
    }
    Ok(())
}
