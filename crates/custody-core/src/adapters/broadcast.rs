//! Broadcast event sink for async consumers.

use crate::domain::CustodyEvent;
use crate::ports::outbound::EventSink;
use tokio::sync::broadcast;
use tracing::debug;

/// Fans events out to every subscriber over a bounded broadcast channel.
///
/// Publishing never blocks. A subscriber that falls more than `capacity`
/// events behind observes `RecvError::Lagged` and must resynchronise from
/// the service.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<CustodyEvent>,
}

impl BroadcastEventSink {
    /// Create a sink buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New receiver observing events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CustodyEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: CustodyEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            debug!(event = name, "[events] no subscribers");
        }
    }
}
