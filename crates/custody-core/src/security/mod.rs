//! # Security Module
//!
//! Owner gate for privileged operations and the reentrancy guard wrapped
//! around every state-mutating entry point.

pub mod access;
pub mod guard;

pub use access::AccessControl;
pub use guard::{GuardToken, ReentrancyGuard};
