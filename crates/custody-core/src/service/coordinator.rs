//! Cross-chain transfer coordinator.
//!
//! `initiate_transfer` locks the sender's funds and announces the transfer;
//! an external relayer performs the destination-side credit and reports back
//! through `complete_transfer`. There is no refund path: escrowed funds stay
//! locked whether or not the relayer ever acknowledges.

use super::{require_identifier, require_positive, CustodyService};
use crate::algorithms::{derive_transfer_id, TransferIdInput};
use crate::domain::{
    Amount, AssetId, ChainId, CustodyError, CustodyEvent, CustodyResult, Principal, TransferId,
    TransferParams, TransferRecord, ValidationError,
};
use crate::ports::inbound::TransferCoordinatorApi;
use crate::ports::outbound::{AssetVault, Clock, EventSink};
use tracing::{debug, info, info_span};

impl<V, E, C> TransferCoordinatorApi for CustodyService<V, E, C>
where
    V: AssetVault,
    E: EventSink,
    C: Clock,
{
    fn initiate_transfer(
        &self,
        sender: &Principal,
        asset: &AssetId,
        amount: Amount,
        target_chain: ChainId,
        target_address: &Principal,
    ) -> CustodyResult<TransferId> {
        let _span = info_span!(
            "initiate_transfer",
            sender = %sender,
            asset = %asset,
            amount,
            target_chain = target_chain.0
        )
        .entered();
        let _token = self.guard.enter("initiate_transfer")?;

        require_identifier(target_address.as_str(), "target_address")?;
        require_positive(amount)?;

        let now = self.clock.now();
        let record = {
            let mut state = self.state.write();
            if !state.registry().is_supported(target_chain) {
                return Err(ValidationError::UnsupportedChain(target_chain).into());
            }
            state.check_debit(sender, asset, amount)?;

            let sequence = state.next_transfer_sequence();
            let id = derive_transfer_id(TransferIdInput {
                sender,
                asset,
                amount,
                target_chain,
                target_address,
                timestamp: now,
                sequence,
            });
            let record = TransferRecord::new(TransferParams {
                id,
                sender: sender.clone(),
                asset: asset.clone(),
                amount,
                target_chain,
                target_address: target_address.clone(),
                created_at: now,
                sequence,
            });
            state.apply_escrow(record.clone())?;
            record
        };

        info!(transfer_id = %record.id, sequence = record.sequence, "[custody] transfer initiated");
        self.emit(CustodyEvent::TransferInitiated {
            transfer_id: record.id,
            sender: record.sender,
            asset: record.asset,
            amount: record.amount,
            target_chain: record.target_chain,
            target_address: record.target_address,
        });
        Ok(record.id)
    }

    fn complete_transfer(&self, caller: &Principal, transfer_id: &TransferId) -> CustodyResult<()> {
        let _span = info_span!("complete_transfer", transfer_id = %transfer_id).entered();
        let _token = self.guard.enter("complete_transfer")?;
        self.access.ensure_owner(caller)?;

        let now = self.clock.now();
        let completed = self.state.write().complete_transfer(transfer_id, now);
        if let Err(err) = completed {
            if err.is_benign() {
                debug!("[custody] transfer already completed");
            }
            return Err(err);
        }

        info!("[custody] transfer completed");
        self.emit(CustodyEvent::TransferCompleted {
            transfer_id: *transfer_id,
        });
        Ok(())
    }

    fn get_transfer(&self, transfer_id: &TransferId) -> CustodyResult<TransferRecord> {
        self.state
            .read()
            .transfer(transfer_id)
            .cloned()
            .ok_or(CustodyError::TransferNotFound(*transfer_id))
    }
}
