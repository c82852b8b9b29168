//! Append-only in-memory event log.

use crate::domain::CustodyEvent;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;

/// Event with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencedEvent {
    /// Position, starting at 1.
    pub sequence: u64,
    /// The event.
    pub event: CustodyEvent,
}

/// Event sink that keeps every event in emission order.
#[derive(Default)]
pub struct InMemoryEventLog {
    entries: RwLock<Vec<SequencedEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, oldest first.
    pub fn events(&self) -> Vec<CustodyEvent> {
        self.entries.read().iter().map(|e| e.event.clone()).collect()
    }

    /// Events with a sequence number greater than `sequence`.
    pub fn since(&self, sequence: u64) -> Vec<SequencedEvent> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.sequence > sequence)
            .cloned()
            .collect()
    }

    /// Number of events logged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: CustodyEvent) {
        let mut entries = self.entries.write();
        let sequence = entries.len() as u64 + 1;
        entries.push(SequencedEvent { sequence, event });
    }
}
