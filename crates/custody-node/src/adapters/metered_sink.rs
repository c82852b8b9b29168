//! # Metered Event Sink
//!
//! Wraps the broadcast sink and updates Prometheus counters as events are
//! published.

use custody_core::{BroadcastEventSink, CustodyEvent, CustodyResult, EventSink};
use custody_telemetry::{
    record_rejection, DEPOSITS, EVENTS_EMITTED, TRANSFERS_COMPLETED, TRANSFERS_INITIATED,
    TRANSFERS_PENDING, WITHDRAWALS,
};
use tokio::sync::broadcast;

/// Event sink that counts events before fanning them out.
pub struct MeteredEventSink {
    inner: BroadcastEventSink,
}

impl MeteredEventSink {
    /// Create a sink buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: BroadcastEventSink::new(capacity),
        }
    }

    /// New receiver observing events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CustodyEvent> {
        self.inner.subscribe()
    }
}

impl EventSink for MeteredEventSink {
    fn emit(&self, event: CustodyEvent) {
        EVENTS_EMITTED.with_label_values(&[event.name()]).inc();
        match &event {
            CustodyEvent::Deposited { asset, .. } => {
                DEPOSITS.with_label_values(&[asset.as_str()]).inc();
            }
            CustodyEvent::Withdrawn { asset, .. } => {
                WITHDRAWALS.with_label_values(&[asset.as_str()]).inc();
            }
            CustodyEvent::TransferInitiated { target_chain, .. } => {
                TRANSFERS_INITIATED
                    .with_label_values(&[&target_chain.to_string()])
                    .inc();
                TRANSFERS_PENDING.inc();
            }
            CustodyEvent::TransferCompleted { .. } => {
                TRANSFERS_COMPLETED.inc();
                TRANSFERS_PENDING.dec();
            }
            CustodyEvent::OwnershipTransferred { .. } => {}
        }
        self.inner.emit(event);
    }
}

/// Count a failed operation under its error kind. Successes are counted by
/// the events they emit.
pub fn record_outcome<T>(operation: &str, result: &CustodyResult<T>) {
    if let Err(err) = result {
        record_rejection(operation, err.kind().as_str());
    }
}
