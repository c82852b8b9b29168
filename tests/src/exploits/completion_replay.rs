//! # Completion Replay
//!
//! A relayer (or anyone replaying its messages) acknowledges the same
//! transfer many times, hoping each acknowledgment counts as a fresh credit.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use custody_core::{
        AssetId, ChainId, CustodyConfig, CustodyError, CustodyLedgerApi, CustodyService,
        InMemoryEventLog, InMemoryVault, ManualClock, Principal, TransferCoordinatorApi,
        TransferId, TransferStatus,
    };

    type Target = CustodyService<InMemoryVault, InMemoryEventLog, ManualClock>;

    fn setup() -> (Arc<Target>, Arc<InMemoryEventLog>, TransferId) {
        let vault = Arc::new(InMemoryVault::new());
        let sender = Principal::new("alice");
        let asset = AssetId::new("USDC");
        vault.fund(&sender, &asset, 100);
        let events = Arc::new(InMemoryEventLog::new());
        let target = Arc::new(CustodyService::new(
            CustodyConfig {
                owner: Principal::new("relayer"),
                supported_chains: vec![ChainId(10)],
                ..CustodyConfig::default()
            },
            vault,
            Arc::clone(&events),
            Arc::new(ManualClock::new(1_700_000_000)),
        ));
        target.deposit(&sender, &asset, 100).unwrap();
        let id = target
            .initiate_transfer(&sender, &asset, 100, ChainId(10), &Principal::new("bob"))
            .unwrap();
        (target, events, id)
    }

    fn completed_events(events: &InMemoryEventLog) -> usize {
        events
            .events()
            .iter()
            .filter(|e| e.name() == "TransferCompleted")
            .count()
    }

    /// ATTACK: sequential replay of the acknowledgment
    #[test]
    fn exploit_sequential_replay() {
        let (target, events, id) = setup();
        let relayer = Principal::new("relayer");

        target.complete_transfer(&relayer, &id).unwrap();
        for _ in 0..10 {
            assert_eq!(
                target.complete_transfer(&relayer, &id),
                Err(CustodyError::DuplicateCompletion(id))
            );
        }

        assert_eq!(completed_events(&events), 1);
        assert_eq!(target.escrowed(&AssetId::new("USDC")), 100);
    }

    /// ATTACK: concurrent replay from several relayer instances
    #[test]
    fn exploit_concurrent_replay() {
        let (target, events, id) = setup();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let target = Arc::clone(&target);
                thread::spawn(move || target.complete_transfer(&Principal::new("relayer"), &id))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(CustodyError::is_benign));
        assert_eq!(completed_events(&events), 1);
        assert_eq!(
            target.get_transfer(&id).unwrap().status,
            TransferStatus::Completed
        );
    }

    /// ATTACK: acknowledge a transfer id that was never initiated
    #[test]
    fn exploit_forged_transfer_id() {
        let (target, _, id) = setup();
        let mut forged = id.0;
        forged[0] ^= 0xFF;
        let forged = TransferId(forged);

        assert_eq!(
            target.complete_transfer(&Principal::new("relayer"), &forged),
            Err(CustodyError::TransferNotFound(forged))
        );
        assert_eq!(
            target.get_transfer(&id).unwrap().status,
            TransferStatus::Initiated
        );
    }
}
