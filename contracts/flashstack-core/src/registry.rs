//! Receiver Registry
//!
//! Deployed receiver contracts, addressed by principal. Deployment is
//! permissionless but write-once: the code behind a principal never
//! changes, so whitelisting a principal approves one fixed receiver.

use std::collections::BTreeMap;

use flashstack_common::{flash::FlashReceiver, types::Principal};

#[derive(Clone, Default)]
pub struct ReceiverRegistry {
    receivers: BTreeMap<Principal, Box<dyn FlashReceiver>>,
}

impl ReceiverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `receiver` at `principal`. Returns false, leaving the
    /// existing receiver in place, if the principal is already taken.
    pub fn deploy(&mut self, principal: Principal, receiver: Box<dyn FlashReceiver>) -> bool {
        if self.receivers.contains_key(&principal) {
            return false;
        }
        self.receivers.insert(principal, receiver);
        true
    }

    pub fn is_deployed(&self, principal: &Principal) -> bool {
        self.receivers.contains_key(principal)
    }

    pub fn get(&self, principal: &Principal) -> Option<&dyn FlashReceiver> {
        self.receivers.get(principal).map(|r| r.as_ref())
    }

    /// Typed view of a deployed receiver
    pub fn inspect<T: 'static>(&self, principal: &Principal) -> Option<&T> {
        self.receivers
            .get(principal)
            .and_then(|r| r.as_any().downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Swap in the post-settlement state of a settled receiver
    pub(crate) fn commit(&mut self, principal: Principal, receiver: Box<dyn FlashReceiver>) {
        self.receivers.insert(principal, receiver);
    }
}

impl core::fmt::Debug for ReceiverRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.receivers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashstack_receivers::{LeverageReceiver, TestReceiver};

    #[test]
    fn test_deploy_and_inspect() {
        let mut registry = ReceiverRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.deploy([9u8; 32], Box::new(TestReceiver::new())));
        assert!(registry.is_deployed(&[9u8; 32]));
        assert!(registry.inspect::<TestReceiver>(&[9u8; 32]).is_some());
        assert!(registry.inspect::<LeverageReceiver>(&[9u8; 32]).is_none());
        assert!(registry.get(&[8u8; 32]).is_none());
    }

    #[test]
    fn test_redeploy_refused() {
        let mut registry = ReceiverRegistry::new();
        registry.deploy([9u8; 32], Box::new(TestReceiver::new()));
        assert!(!registry.deploy([9u8; 32], Box::new(LeverageReceiver::new([1u8; 32]))));
        assert_eq!(registry.len(), 1);
        assert!(registry.inspect::<TestReceiver>(&[9u8; 32]).is_some());
        assert!(registry.inspect::<LeverageReceiver>(&[9u8; 32]).is_none());
    }
}
