//! # Algorithms Module
//!
//! Pure functions used by the transfer coordinator.

pub mod transfer_id;

pub use transfer_id::{derive_transfer_id, TransferIdInput};
