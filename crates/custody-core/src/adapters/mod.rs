//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound ports: an asset vault with
//! external balances, event sinks and clocks.

mod broadcast;
mod clock;
mod event_log;
mod vault;

pub use broadcast::BroadcastEventSink;
pub use clock::{ManualClock, SystemClock};
pub use event_log::{InMemoryEventLog, SequencedEvent};
pub use vault::InMemoryVault;
