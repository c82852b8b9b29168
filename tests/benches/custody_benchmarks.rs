//! # Custody-Bridge Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | Ledger | deposit + withdraw | < 10µs |
//! | Ledger | get_holdings (1000 assets) | < 1ms |
//! | Coordinator | transfer-id derivation | < 2µs |
//! | Coordinator | initiate + complete | < 20µs |

use criterion::{criterion_group, criterion_main};
use custody_tests::benchmarks::{custody_ledger, transfer_coordinator};

criterion_group!(
    ledger,
    custody_ledger::bench_deposit_withdraw,
    custody_ledger::bench_get_holdings,
    custody_ledger::bench_contended_withdrawals
);

criterion_group!(
    coordinator,
    transfer_coordinator::bench_transfer_id,
    transfer_coordinator::bench_transfer_lifecycle,
    transfer_coordinator::bench_pending_scan
);

criterion_main!(ledger, coordinator);
