//! Chain registry administration.

use super::CustodyService;
use crate::domain::{ChainId, CustodyResult, Principal};
use crate::ports::inbound::ChainRegistryApi;
use crate::ports::outbound::{AssetVault, Clock, EventSink};
use tracing::{debug, info};

impl<V, E, C> ChainRegistryApi for CustodyService<V, E, C>
where
    V: AssetVault,
    E: EventSink,
    C: Clock,
{
    fn add_supported_chain(&self, caller: &Principal, chain_id: ChainId) -> CustodyResult<()> {
        self.access.ensure_owner(caller)?;
        let now = self.clock.now();
        if self.state.write().registry_mut().add(chain_id, now) {
            info!(chain_id = chain_id.0, "[custody] chain added");
        } else {
            debug!(chain_id = chain_id.0, "[custody] chain already supported");
        }
        Ok(())
    }

    fn remove_supported_chain(&self, caller: &Principal, chain_id: ChainId) -> CustodyResult<()> {
        self.access.ensure_owner(caller)?;
        let now = self.clock.now();
        if self.state.write().registry_mut().remove(chain_id, now) {
            info!(chain_id = chain_id.0, "[custody] chain removed");
        } else {
            debug!(chain_id = chain_id.0, "[custody] chain was not supported");
        }
        Ok(())
    }

    fn is_supported(&self, chain_id: ChainId) -> bool {
        self.state.read().registry().is_supported(chain_id)
    }
}
