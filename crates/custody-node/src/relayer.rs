//! # Loopback Relayer
//!
//! In-process stand-in for the external relayer. Listens for
//! `TransferInitiated`, hands each transfer to a [`DestinationExecutor`] and,
//! once the destination side reports success, acknowledges it with
//! `complete_transfer` as the owner principal.
//!
//! The core never waits on the relayer. A failed delivery leaves the transfer
//! `Initiated`. Transient failures are queued and redelivered every
//! `retry_interval_ms`; anything else is picked up by the next rescan
//! (startup or broadcast lag).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use custody_core::{
    CustodyEvent, Principal, TransferCoordinatorApi, TransferId, TransferRecord, TransferStatus,
};
use custody_telemetry::{time_histogram, RELAY_ATTEMPTS, RELAY_DURATION};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::adapters::record_outcome;
use crate::container::{NodeService, RelayerConfig};

/// Destination-side delivery failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Destination refused the credit.
    #[error("destination rejected transfer {transfer_id}: {reason}")]
    Rejected {
        /// Transfer id
        transfer_id: TransferId,
        /// Reason given by the destination
        reason: String,
    },

    /// Destination could not be reached.
    #[error("destination unavailable: {0}")]
    Unavailable(String),
}

impl DeliveryError {
    /// Whether a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Performs the destination-side credit for a transfer.
#[async_trait]
pub trait DestinationExecutor: Send + Sync + 'static {
    /// Credit `transfer.amount` to `transfer.target_address` on
    /// `transfer.target_chain`.
    async fn deliver(&self, transfer: &TransferRecord) -> Result<(), DeliveryError>;
}

/// Executor that only logs the credit it would perform.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDestination;

#[async_trait]
impl DestinationExecutor for LoggingDestination {
    async fn deliver(&self, transfer: &TransferRecord) -> Result<(), DeliveryError> {
        info!(
            transfer_id = %transfer.id,
            target_chain = transfer.target_chain.0,
            target_address = %transfer.target_address,
            asset = %transfer.asset,
            amount = transfer.amount,
            "[relayer] destination credit"
        );
        Ok(())
    }
}

/// Counters for one relayer run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayerStats {
    /// Transfers acknowledged by this relayer.
    pub completed: u64,
    /// Acknowledgments answered with `DuplicateCompletion`.
    pub duplicates: u64,
    /// Deliveries or acknowledgments that failed.
    pub failed: u64,
    /// Rescans of `Initiated` transfers.
    pub rescans: u64,
    /// Redelivery attempts from the retry queue.
    pub retries: u64,
}

/// Relayer loop bound to one custody service.
pub struct LoopbackRelayer<D: DestinationExecutor> {
    service: Arc<NodeService>,
    receiver: broadcast::Receiver<CustodyEvent>,
    executor: Arc<D>,
    operator: Principal,
    config: RelayerConfig,
    stats: RelayerStats,
    retry: BTreeSet<TransferId>,
}

impl<D: DestinationExecutor> LoopbackRelayer<D> {
    /// Create a relayer reading from `receiver` and acknowledging as `operator`.
    pub fn new(
        service: Arc<NodeService>,
        receiver: broadcast::Receiver<CustodyEvent>,
        executor: Arc<D>,
        operator: Principal,
        config: RelayerConfig,
    ) -> Self {
        Self {
            service,
            receiver,
            executor,
            operator,
            config,
            stats: RelayerStats::default(),
            retry: BTreeSet::new(),
        }
    }

    /// Run until `shutdown` flips or the event channel closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> RelayerStats {
        info!(operator = %self.operator, "[relayer] started");
        self.rescan().await;

        let period = Duration::from_millis(self.config.retry_interval_ms.max(1));
        let mut retry_tick = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        retry_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("[relayer] Shutdown signal received");
                    break;
                }
                _ = retry_tick.tick() => {
                    self.retry_pending().await;
                }
                received = self.receiver.recv() => match received {
                    Ok(CustodyEvent::TransferInitiated { transfer_id, .. }) => {
                        self.relay(transfer_id).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("[relayer] Lagged by {} events, rescanning", n);
                        self.rescan().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("[relayer] Event channel closed");
                        break;
                    }
                },
            }
        }

        info!(
            completed = self.stats.completed,
            duplicates = self.stats.duplicates,
            failed = self.stats.failed,
            queued = self.retry.len(),
            "[relayer] stopped"
        );
        self.stats
    }

    /// Relay every transfer still `Initiated`, oldest first.
    pub async fn rescan(&mut self) {
        self.stats.rescans += 1;
        let pending = self.service.transfers_by_status(TransferStatus::Initiated);
        if !pending.is_empty() {
            info!(count = pending.len(), "[relayer] relaying pending transfers");
        }
        for record in pending {
            self.relay(record.id).await;
        }
    }

    /// Redeliver every transfer whose last delivery failed transiently.
    pub async fn retry_pending(&mut self) {
        if self.retry.is_empty() {
            return;
        }
        let queued = std::mem::take(&mut self.retry);
        debug!(count = queued.len(), "[relayer] redelivering failed transfers");
        for transfer_id in queued {
            self.stats.retries += 1;
            self.relay(transfer_id).await;
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> RelayerStats {
        self.stats
    }

    /// Transfers waiting for redelivery.
    pub fn queued(&self) -> usize {
        self.retry.len()
    }

    async fn relay(&mut self, transfer_id: TransferId) {
        let record = match self.service.get_transfer(&transfer_id) {
            Ok(record) => record,
            Err(err) => {
                warn!(transfer_id = %transfer_id, error = %err, "[relayer] unknown transfer");
                self.stats.failed += 1;
                return;
            }
        };
        if record.status.is_terminal() {
            debug!(transfer_id = %transfer_id, "[relayer] already completed");
            return;
        }

        let _timer = time_histogram!(RELAY_DURATION);
        if self.config.ack_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.ack_delay_ms)).await;
        }

        if let Err(err) = self.executor.deliver(&record).await {
            warn!(transfer_id = %transfer_id, error = %err, "[relayer] delivery failed");
            RELAY_ATTEMPTS.with_label_values(&["failed"]).inc();
            self.stats.failed += 1;
            if err.is_transient() {
                self.retry.insert(transfer_id);
            }
            return;
        }

        let result = self.service.complete_transfer(&self.operator, &transfer_id);
        record_outcome("complete_transfer", &result);
        match result {
            Ok(()) => {
                info!(transfer_id = %transfer_id, "[relayer] transfer acknowledged");
                RELAY_ATTEMPTS.with_label_values(&["completed"]).inc();
                self.stats.completed += 1;
            }
            Err(err) if err.is_benign() => {
                debug!(transfer_id = %transfer_id, "[relayer] acknowledgment was a duplicate");
                RELAY_ATTEMPTS.with_label_values(&["duplicate"]).inc();
                self.stats.duplicates += 1;
            }
            Err(err) => {
                warn!(
                    transfer_id = %transfer_id,
                    error = %err,
                    "[relayer] acknowledgment rejected"
                );
                RELAY_ATTEMPTS.with_label_values(&["failed"]).inc();
                self.stats.failed += 1;
            }
        }
    }
}
