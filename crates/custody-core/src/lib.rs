//! # Custody Core
//!
//! Asset custody ledger with a two-phase, relayer-acknowledged cross-chain
//! transfer protocol.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Hold fungible assets on behalf of principals (deposit / withdraw)
//! - Escrow funds for transfers to other networks and announce them
//! - Accept an owner-signed acknowledgment once the destination credit landed
//!
//! ## Security Features
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Reentrancy guard | Nested calls from the asset vault fail with `Reentrancy` |
//! | Checks-effects-interactions | Holdings are debited before any payout |
//! | Owner gate | Registry changes and completions require the owner |
//! | Unique transfer ids | SHA-256 over the request and a per-service sequence |
//!
//! ## Module Structure
//!
//! ```text
//! custody-core/
//! ├── domain/          # Value objects, records, events, errors, invariants
//! ├── algorithms/      # Transfer-id derivation
//! ├── ports/           # Inbound APIs, outbound vault / events / clock
//! ├── adapters/        # In-memory vault, event log, broadcast sink, clocks
//! ├── security/        # AccessControl, ReentrancyGuard
//! ├── store.rs         # Ledger state and its mutations
//! └── service/         # CustodyService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod security;
pub mod service;
pub mod store;

// Re-exports
pub use adapters::{
    BroadcastEventSink, InMemoryEventLog, InMemoryVault, ManualClock, SequencedEvent, SystemClock,
};
pub use algorithms::{derive_transfer_id, TransferIdInput};
pub use config::{CustodyConfig, DEFAULT_EVENT_CAPACITY};
pub use domain::{
    check_custody_balance, check_solvency, Amount, AssetId, ChainEntry, ChainId, ChainRegistry,
    CustodyError, CustodyEvent, CustodyResult, ErrorKind, EventTopic, Holding, InvariantViolation,
    JournalEntry, JournalKind, Principal, Timestamp, TransferId, TransferRecord, TransferStatus,
    ValidationError, VaultError,
};
pub use ports::{
    AssetVault, ChainRegistryApi, Clock, CustodyLedgerApi, EventSink, TransferCoordinatorApi,
};
pub use security::{AccessControl, ReentrancyGuard};
pub use service::CustodyService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
