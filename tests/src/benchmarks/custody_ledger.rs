//! # Custody Ledger Benchmarks
//!
//! - Deposit / withdraw round trip on one holding
//! - Holdings query for an owner with many assets
//! - Contended withdrawals from several threads

use std::sync::Arc;
use std::thread;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use custody_core::{
    AssetId, CustodyConfig, CustodyLedgerApi, CustodyService, InMemoryEventLog, InMemoryVault,
    ManualClock, Principal,
};

/// Service type used by the benchmarks.
pub type BenchService = CustodyService<InMemoryVault, InMemoryEventLog, ManualClock>;

/// Service with `owner` funded externally with `amount` of `asset`.
pub fn funded_service(owner: &Principal, asset: &AssetId, amount: u128) -> BenchService {
    let vault = Arc::new(InMemoryVault::new());
    vault.fund(owner, asset, amount);
    CustodyService::new(
        CustodyConfig::default(),
        vault,
        Arc::new(InMemoryEventLog::new()),
        Arc::new(ManualClock::new(1_700_000_000)),
    )
}

/// Deposit then withdraw the same amount.
pub fn bench_deposit_withdraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("custody-ledger");
    let owner = Principal::new("alice");
    let asset = AssetId::new("TOKEN_A");
    let service = funded_service(&owner, &asset, u64::MAX as u128);

    group.throughput(Throughput::Elements(2));
    group.bench_function("deposit_withdraw", |b| {
        b.iter(|| {
            service.deposit(&owner, &asset, black_box(10)).ok();
            service.withdraw(&owner, &asset, black_box(10)).ok();
        })
    });
    group.finish();
}

/// `get_holdings` for owners holding 10..1000 assets.
pub fn bench_get_holdings(c: &mut Criterion) {
    let mut group = c.benchmark_group("custody-ledger-holdings");
    let owner = Principal::new("whale");

    for size in [10usize, 100, 1_000] {
        let vault = Arc::new(InMemoryVault::new());
        let service = CustodyService::new(
            CustodyConfig::default(),
            Arc::clone(&vault),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(1_700_000_000)),
        );
        for i in 0..size {
            let asset = AssetId::new(format!("ASSET_{i:04}"));
            vault.fund(&owner, &asset, 100);
            service.deposit(&owner, &asset, 100).ok();
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("get_holdings", size), &size, |b, _| {
            b.iter(|| black_box(service.get_holdings(&owner)))
        });
    }
    group.finish();
}

/// Withdrawals from 4 threads on one lane.
pub fn bench_contended_withdrawals(c: &mut Criterion) {
    let mut group = c.benchmark_group("custody-ledger-contention");
    let owner = Principal::new("alice");
    let asset = AssetId::new("TOKEN_A");
    let service = Arc::new(funded_service(&owner, &asset, u64::MAX as u128));
    service.deposit(&owner, &asset, u64::MAX as u128 / 2).ok();

    group.throughput(Throughput::Elements(400));
    group.bench_function("withdraw_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let service = Arc::clone(&service);
                    let owner = owner.clone();
                    let asset = asset.clone();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            service.withdraw(&owner, &asset, 1).ok();
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().ok();
            }
        })
    });
    group.finish();
}
