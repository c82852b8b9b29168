//! # Outbound Ports
//!
//! Traits for the collaborators the service calls out to: the external
//! asset-transfer mechanism, the event stream and the clock.

use crate::domain::{Amount, AssetId, CustodyEvent, Principal, Timestamp, VaultError};

/// External asset-transfer mechanism.
///
/// Implementations are untrusted: they may fail, and they may call back into
/// the custody service while a mutation is in flight.
pub trait AssetVault: Send + Sync {
    /// Move `amount` of `asset` from `from`'s external balance into custody.
    fn pull(&self, from: &Principal, asset: &AssetId, amount: Amount) -> Result<(), VaultError>;

    /// Pay `amount` of `asset` out of custody to `to`.
    fn push(&self, to: &Principal, asset: &AssetId, amount: Amount) -> Result<(), VaultError>;
}

/// Ordered, append-only event stream.
pub trait EventSink: Send + Sync {
    /// Publish an event. Must not call back into the service.
    fn emit(&self, event: CustodyEvent);
}

/// Time source.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}
