//! Single-owner authorization gate.

use crate::domain::{CustodyError, CustodyResult, Principal};
use parking_lot::RwLock;
use tracing::warn;

/// Owner-only access control.
pub struct AccessControl {
    owner: RwLock<Principal>,
}

impl AccessControl {
    /// Create with the initial owner.
    pub fn new(owner: Principal) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Principal {
        self.owner.read().clone()
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Principal) -> CustodyResult<()> {
        if *self.owner.read() != *caller {
            warn!(caller = %caller, "[custody] rejected non-owner call");
            return Err(CustodyError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    pub fn transfer(&self, caller: &Principal, new_owner: Principal) -> CustodyResult<Principal> {
        let mut owner = self.owner.write();
        if *owner != *caller {
            warn!(caller = %caller, "[custody] rejected non-owner ownership transfer");
            return Err(CustodyError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(std::mem::replace(&mut *owner, new_owner))
    }
}
