//! # Integration Test Flows
//!
//! End-to-end flows through the node container:
//!
//! 1. **Deposit → initiate → relayer acknowledgment**: the relayer observes
//!    `TransferInitiated` and completes the transfer as the owner
//! 2. **Analytics consumer**: a second subscriber sees the full, ordered
//!    event stream
//! 3. **Randomized activity**: solvency and custody balance hold after any
//!    mix of operations

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tokio::time::timeout;

    use custody_core::{
        AssetId, ChainId, ChainRegistryApi, CustodyConfig, CustodyEvent, CustodyLedgerApi,
        Principal, TransferCoordinatorApi, TransferId, TransferRecord, TransferStatus,
    };
    use custody_node::{
        CustodyContainer, DeliveryError, DestinationExecutor, NodeConfig, NodeRuntime,
        RelayerConfig,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn owner() -> Principal {
        Principal::new("bridge-ops")
    }

    fn alice() -> Principal {
        Principal::new("alice")
    }

    fn bob() -> Principal {
        Principal::new("bob")
    }

    fn token_a() -> AssetId {
        AssetId::new("TOKEN_A")
    }

    fn create_test_config(relayer: bool) -> NodeConfig {
        NodeConfig {
            custody: CustodyConfig {
                owner: owner(),
                supported_chains: vec![ChainId(1), ChainId(137)],
                event_channel_capacity: 256,
            },
            relayer: RelayerConfig {
                enabled: relayer,
                ack_delay_ms: 0,
                ..RelayerConfig::default()
            },
            ..NodeConfig::default()
        }
    }

    /// Destination ledger that records every credit it receives.
    #[derive(Default)]
    struct DestinationLedger {
        credits: Mutex<Vec<(ChainId, Principal, u128)>>,
    }

    #[async_trait]
    impl DestinationExecutor for DestinationLedger {
        async fn deliver(&self, transfer: &TransferRecord) -> Result<(), DeliveryError> {
            self.credits.lock().push((
                transfer.target_chain,
                transfer.target_address.clone(),
                transfer.amount,
            ));
            Ok(())
        }
    }

    async fn wait_completed(container: &CustodyContainer, id: &TransferId) {
        timeout(Duration::from_secs(5), async {
            loop {
                let status = container.service.get_transfer(id).map(|r| r.status);
                if status == Ok(TransferStatus::Completed) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("relayer did not complete transfer");
    }

    // =============================================================================
    // INTEGRATION TESTS: CONTAINER → RELAYER
    // =============================================================================

    #[tokio::test]
    async fn test_transfer_is_relayed_and_acknowledged() {
        let runtime = NodeRuntime::new(create_test_config(true));
        let destination = Arc::new(DestinationLedger::default());
        runtime.start_with(Arc::clone(&destination));
        let container = runtime.container();

        container.vault.fund(&alice(), &token_a(), 500);
        container.service.deposit(&alice(), &token_a(), 500).unwrap();
        let id = container
            .service
            .initiate_transfer(&alice(), &token_a(), 120, ChainId(137), &bob())
            .unwrap();

        wait_completed(&container, &id).await;

        assert_eq!(
            *destination.credits.lock(),
            vec![(ChainId(137), bob(), 120)]
        );
        assert_eq!(container.service.get_balance(&alice(), &token_a()), 380);
        assert_eq!(container.service.escrowed(&token_a()), 120);
        assert!(container.service.verify_invariants().is_ok());

        let stats = runtime.shutdown().await.unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.duplicates, 0);
    }

    #[tokio::test]
    async fn test_manual_ack_before_relayer_is_benign() {
        let runtime = NodeRuntime::new(create_test_config(false));
        let container = runtime.container();
        container.vault.fund(&alice(), &token_a(), 10);
        container.service.deposit(&alice(), &token_a(), 10).unwrap();
        let id = container
            .service
            .initiate_transfer(&alice(), &token_a(), 10, ChainId(1), &bob())
            .unwrap();

        // An operator acknowledges by hand; the relayer then races the same id.
        container.service.complete_transfer(&owner(), &id).unwrap();
        let mut relayer = container.relayer(Arc::new(DestinationLedger::default()));
        relayer.rescan().await;

        assert_eq!(relayer.stats().completed, 0);
        assert_eq!(relayer.stats().failed, 0);
    }

    #[tokio::test]
    async fn test_analytics_subscriber_sees_ordered_stream() {
        let runtime = NodeRuntime::new(create_test_config(true));
        let container = runtime.container();
        let mut analytics = container.events.subscribe();
        runtime.start();

        container.vault.fund(&alice(), &token_a(), 100);
        container.service.deposit(&alice(), &token_a(), 100).unwrap();
        container.service.withdraw(&alice(), &token_a(), 30).unwrap();
        let id = container
            .service
            .initiate_transfer(&alice(), &token_a(), 20, ChainId(1), &bob())
            .unwrap();
        wait_completed(&container, &id).await;
        runtime.shutdown().await;

        let mut names = Vec::new();
        while let Ok(event) = analytics.try_recv() {
            names.push(event.name());
            if let CustodyEvent::TransferInitiated { amount, .. } = event {
                assert_eq!(amount, 20);
            }
        }
        assert_eq!(
            names,
            vec!["Deposited", "Withdrawn", "TransferInitiated", "TransferCompleted"]
        );
    }

    #[tokio::test]
    async fn test_removed_chain_transfer_still_relayed() {
        let runtime = NodeRuntime::new(create_test_config(false));
        let container = runtime.container();
        container.vault.fund(&alice(), &token_a(), 50);
        container.service.deposit(&alice(), &token_a(), 50).unwrap();
        let id = container
            .service
            .initiate_transfer(&alice(), &token_a(), 50, ChainId(137), &bob())
            .unwrap();
        container
            .service
            .remove_supported_chain(&owner(), ChainId(137))
            .unwrap();

        let mut relayer = container.relayer(Arc::new(DestinationLedger::default()));
        relayer.rescan().await;

        assert_eq!(relayer.stats().completed, 1);
        assert_eq!(
            container.service.get_transfer(&id).unwrap().status,
            TransferStatus::Completed
        );
    }

    // =============================================================================
    // INTEGRATION TESTS: RANDOMIZED ACTIVITY
    // =============================================================================

    #[test]
    fn test_random_activity_preserves_invariants() {
        let container = CustodyContainer::new(create_test_config(false));
        let users: Vec<Principal> = (0..4).map(|i| Principal::new(format!("user-{i}"))).collect();
        let assets = [AssetId::new("TOKEN_A"), AssetId::new("TOKEN_B")];
        for user in &users {
            for asset in &assets {
                container.vault.fund(user, asset, 1_000_000);
            }
        }

        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
        let mut pending = Vec::new();
        for _ in 0..2_000 {
            let user = &users[rng.gen_range(0..users.len())];
            let asset = &assets[rng.gen_range(0..assets.len())];
            let amount = rng.gen_range(0..500u128);
            match rng.gen_range(0..4) {
                0 => {
                    let _ = container.service.deposit(user, asset, amount);
                }
                1 => {
                    let _ = container.service.withdraw(user, asset, amount);
                }
                2 => {
                    let chain = if rng.gen_bool(0.9) { ChainId(1) } else { ChainId(999) };
                    if let Ok(id) =
                        container
                            .service
                            .initiate_transfer(user, asset, amount, chain, &bob())
                    {
                        pending.push(id);
                    }
                }
                _ => {
                    if let Some(id) = pending.pop() {
                        container.service.complete_transfer(&owner(), &id).unwrap();
                    }
                }
            }
        }

        assert!(container.service.verify_invariants().is_ok());
        for asset in &assets {
            let held: u128 = users
                .iter()
                .map(|u| container.service.get_balance(u, asset))
                .sum();
            assert_eq!(
                held + container.service.escrowed(asset),
                container.service.custody_total(asset)
            );
            let external: u128 = users
                .iter()
                .map(|u| container.vault.external_balance(u, asset))
                .sum();
            assert_eq!(external + container.service.custody_total(asset), 4_000_000);
        }
    }

    #[test]
    fn test_registry_changes_only_by_owner() {
        let container = CustodyContainer::new(create_test_config(false));
        assert!(container
            .service
            .add_supported_chain(&alice(), ChainId(56))
            .is_err());
        container
            .service
            .add_supported_chain(&owner(), ChainId(56))
            .unwrap();
        assert_eq!(
            container.service.supported_chains(),
            vec![ChainId(1), ChainId(56), ChainId(137)]
        );
    }
}
