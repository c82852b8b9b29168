//! Asset custody ledger: deposit, withdraw and balance queries.

use super::{require_identifier, require_positive, CustodyService};
use crate::domain::{Amount, AssetId, CustodyError, CustodyEvent, CustodyResult, Holding, Principal};
use crate::ports::inbound::CustodyLedgerApi;
use crate::ports::outbound::{AssetVault, Clock, EventSink};
use tracing::{debug, info, info_span, warn};

impl<V, E, C> CustodyLedgerApi for CustodyService<V, E, C>
where
    V: AssetVault,
    E: EventSink,
    C: Clock,
{
    /// Pull first, credit only on confirmed receipt.
    fn deposit(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> CustodyResult<Amount> {
        let _span = info_span!("deposit", owner = %owner, asset = %asset, amount).entered();
        let _token = self.guard.enter("deposit")?;

        require_identifier(owner.as_str(), "owner")?;
        require_identifier(asset.as_str(), "asset")?;
        require_positive(amount)?;
        // Reject overflow before funds move so a confirmed pull is always credited.
        self.state.read().check_credit(owner, asset, amount)?;

        self.vault.pull(owner, asset, amount)?;

        let now = self.clock.now();
        let credited = self.state.write().apply_deposit(owner, asset, amount, now);
        let balance = match credited {
            Ok(balance) => balance,
            Err(err) => {
                warn!(error = %err, "[custody] credit failed after pull, returning funds");
                self.vault.push(owner, asset, amount)?;
                return Err(err);
            }
        };

        info!(balance, "[custody] deposit credited");
        self.emit(CustodyEvent::Deposited {
            owner: owner.clone(),
            asset: asset.clone(),
            amount,
            timestamp: now,
        });
        Ok(balance)
    }

    /// Checks-effects-interactions: the holding is debited and journalled
    /// before the payout, and restored with a reversal entry if it fails.
    fn withdraw(
        &self,
        owner: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> CustodyResult<Amount> {
        let _span = info_span!("withdraw", owner = %owner, asset = %asset, amount).entered();
        let _token = self.guard.enter("withdraw")?;

        require_positive(amount)?;

        let now = self.clock.now();
        let (remaining, pending) = self.state.write().begin_withdrawal(owner, asset, amount, now)?;

        if let Err(err) = self.vault.push(owner, asset, amount) {
            warn!(error = %err, "[custody] payout failed, rolling back withdrawal");
            self.state.write().rollback_withdrawal(pending, self.clock.now());
            return Err(CustodyError::Vault(err));
        }

        info!(remaining, "[custody] withdrawal paid out");
        self.emit(CustodyEvent::Withdrawn {
            owner: owner.clone(),
            asset: asset.clone(),
            amount,
            timestamp: now,
        });
        Ok(remaining)
    }

    fn get_balance(&self, owner: &Principal, asset: &AssetId) -> Amount {
        let balance = self.state.read().balance(owner, asset);
        debug!(owner = %owner, asset = %asset, balance, "[custody] balance query");
        balance
    }

    fn get_holdings(&self, owner: &Principal) -> Vec<Holding> {
        self.state.read().holdings_of(owner)
    }
}
