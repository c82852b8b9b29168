//! # Reentrancy Drain (DAO-style)
//!
//! The attacker controls the asset vault's payout hook. On every payout it
//! re-enters `withdraw` for the same amount, hoping the holding is debited
//! only once per nested payout. A second variant tries to move the
//! being-withdrawn funds into escrow from inside the callback.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, OnceLock, Weak};

    use parking_lot::Mutex;

    use custody_core::{
        AssetId, AssetVault, ChainId, CustodyConfig, CustodyError, CustodyLedgerApi,
        CustodyService, InMemoryEventLog, InMemoryVault, ManualClock, Principal,
        TransferCoordinatorApi, TransferStatus, VaultError,
    };

    type Target = CustodyService<AttackVault, InMemoryEventLog, ManualClock>;

    /// Vault whose payout hook re-enters the ledger up to `depth` times.
    struct AttackVault {
        inner: InMemoryVault,
        target: OnceLock<Weak<Target>>,
        depth: usize,
        via_escrow: bool,
        attempts: Mutex<Vec<Result<(), CustodyError>>>,
    }

    impl AssetVault for AttackVault {
        fn pull(&self, from: &Principal, asset: &AssetId, amount: u128) -> Result<(), VaultError> {
            self.inner.pull(from, asset, amount)
        }

        fn push(&self, to: &Principal, asset: &AssetId, amount: u128) -> Result<(), VaultError> {
            if let Some(target) = self.target.get().and_then(Weak::upgrade) {
                for _ in 0..self.depth {
                    let result = if self.via_escrow {
                        target
                            .initiate_transfer(to, asset, amount, ChainId(1), to)
                            .map(|_| ())
                    } else {
                        target.withdraw(to, asset, amount).map(|_| ())
                    };
                    self.attempts.lock().push(result);
                }
            }
            self.inner.push(to, asset, amount)
        }
    }

    fn attacker() -> Principal {
        Principal::new("attacker")
    }

    fn victim() -> Principal {
        Principal::new("victim")
    }

    fn eth() -> AssetId {
        AssetId::new("ETH")
    }

    fn setup(depth: usize, via_escrow: bool) -> (Arc<Target>, Arc<AttackVault>) {
        let vault = Arc::new(AttackVault {
            inner: InMemoryVault::new(),
            target: OnceLock::new(),
            depth,
            via_escrow,
            attempts: Mutex::new(Vec::new()),
        });
        vault.inner.fund(&attacker(), &eth(), 10);
        vault.inner.fund(&victim(), &eth(), 1_000);

        let config = CustodyConfig {
            supported_chains: vec![ChainId(1)],
            ..CustodyConfig::default()
        };
        let target = Arc::new(CustodyService::new(
            config,
            Arc::clone(&vault),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(1_700_000_000)),
        ));
        let _ = vault.target.set(Arc::downgrade(&target));

        target.deposit(&victim(), &eth(), 1_000).unwrap();
        target.deposit(&attacker(), &eth(), 10).unwrap();
        (target, vault)
    }

    /// ATTACK: recursive withdraw from the payout hook
    #[test]
    fn exploit_recursive_withdraw_is_refused() {
        let (target, vault) = setup(5, false);

        assert_eq!(target.withdraw(&attacker(), &eth(), 10).unwrap(), 0);

        let attempts = vault.attempts.lock().clone();
        assert_eq!(attempts.len(), 5);
        assert!(attempts.iter().all(|r| matches!(
            r,
            Err(CustodyError::Reentrancy {
                operation: "withdraw"
            })
        )));

        // Attacker got exactly its own 10 back; the victim is untouched.
        assert_eq!(vault.inner.external_balance(&attacker(), &eth()), 10);
        assert_eq!(target.get_balance(&victim(), &eth()), 1_000);
        assert_eq!(target.custody_total(&eth()), 1_000);
        assert!(target.verify_invariants().is_ok());
    }

    /// ATTACK: move the in-flight withdrawal into escrow from the payout hook
    #[test]
    fn exploit_escrow_during_payout_is_refused() {
        let (target, vault) = setup(1, true);

        target.withdraw(&attacker(), &eth(), 10).unwrap();

        assert!(matches!(
            vault.attempts.lock()[0],
            Err(CustodyError::Reentrancy {
                operation: "initiate_transfer"
            })
        ));
        assert!(target.transfers_by_status(TransferStatus::Initiated).is_empty());
        assert_eq!(target.escrowed(&eth()), 0);
    }

    /// ATTACK: repeat the drain after a failed payout, relying on a stuck guard
    #[test]
    fn exploit_guard_released_after_failed_payout() {
        let (target, vault) = setup(0, false);

        vault.inner.fail_next_push("bridge paused");
        assert!(target.withdraw(&attacker(), &eth(), 10).is_err());
        assert_eq!(target.get_balance(&attacker(), &eth()), 10);

        // The guard was released: a legitimate retry succeeds exactly once.
        assert_eq!(target.withdraw(&attacker(), &eth(), 10).unwrap(), 0);
        assert!(matches!(
            target.withdraw(&attacker(), &eth(), 10),
            Err(CustodyError::InsufficientBalance { .. })
        ));
    }
}
