//! # Admin Spoofing
//!
//! A non-owner attempts every privileged operation: registry changes,
//! transfer acknowledgment and ownership takeover.

#[cfg(test)]
mod tests {
    use custody_core::{
        AssetId, ChainId, ChainRegistryApi, CustodyConfig, CustodyError, CustodyLedgerApi,
        Principal, TransferCoordinatorApi, TransferStatus,
    };
    use custody_node::{CustodyContainer, NodeConfig};

    fn owner() -> Principal {
        Principal::new("multisig")
    }

    fn mallory() -> Principal {
        Principal::new("mallory")
    }

    fn setup() -> CustodyContainer {
        CustodyContainer::new(NodeConfig {
            custody: CustodyConfig {
                owner: owner(),
                supported_chains: vec![ChainId(1)],
                ..CustodyConfig::default()
            },
            ..NodeConfig::default()
        })
    }

    fn unauthorized(result: Result<(), CustodyError>) -> bool {
        matches!(result, Err(CustodyError::Unauthorized { caller }) if caller == mallory())
    }

    /// ATTACK: whitelist an attacker-controlled chain
    #[test]
    fn exploit_add_rogue_chain() {
        let container = setup();
        assert!(unauthorized(
            container.service.add_supported_chain(&mallory(), ChainId(666))
        ));
        assert!(!container.service.is_supported(ChainId(666)));
    }

    /// ATTACK: delist a chain to censor transfers
    #[test]
    fn exploit_remove_chain() {
        let container = setup();
        assert!(unauthorized(
            container.service.remove_supported_chain(&mallory(), ChainId(1))
        ));
        assert!(container.service.is_supported(ChainId(1)));
    }

    /// ATTACK: self-acknowledge a transfer to fake destination delivery
    #[test]
    fn exploit_self_acknowledge() {
        let container = setup();
        let asset = AssetId::new("USDC");
        container.vault.fund(&mallory(), &asset, 50);
        container.service.deposit(&mallory(), &asset, 50).unwrap();
        let id = container
            .service
            .initiate_transfer(&mallory(), &asset, 50, ChainId(1), &mallory())
            .unwrap();

        assert!(unauthorized(container.service.complete_transfer(&mallory(), &id)));
        assert_eq!(
            container.service.get_transfer(&id).unwrap().status,
            TransferStatus::Initiated
        );
    }

    /// ATTACK: take over the owner role, then spoof a principal that only
    /// looks like the owner
    #[test]
    fn exploit_ownership_takeover() {
        let container = setup();
        assert!(unauthorized(
            container.service.transfer_ownership(&mallory(), mallory())
        ));
        assert!(container
            .service
            .add_supported_chain(&Principal::new("multisig "), ChainId(7))
            .is_err());
        assert!(container
            .service
            .add_supported_chain(&Principal::new("MULTISIG"), ChainId(7))
            .is_err());
        assert_eq!(container.service.owner(), owner());
    }
}
