//! # Custody-Bridge Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Ledger and coordinator throughput
//! ├── exploits/         # Attack simulations
//! │   ├── reentrancy_drain.rs
//! │   ├── completion_replay.rs
//! │   └── admin_spoofing.rs
//! └── integration/      # Node container + relayer end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p custody-tests
//!
//! # By category
//! cargo test -p custody-tests integration::
//! cargo test -p custody-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p custody-tests
//! ```

#![allow(dead_code)]
