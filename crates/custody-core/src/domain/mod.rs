//! # Domain Module
//!
//! Core domain types for custody and cross-chain transfers.

pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod registry;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use invariants::*;
pub use registry::ChainRegistry;
pub use value_objects::*;
