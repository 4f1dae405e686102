//! Access Control Module
//!
//! FlashStack has a single admin. Every privileged operation checks the
//! caller against the current admin at its own entry point; nothing is
//! inherited from an earlier check. A failed check reports only
//! `UNAUTHORIZED`.
//!
//! The receiver whitelist also lives here: it decides which receivers may
//! be handed flash-minted funds at all.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    check,
    config::ProtocolConfig,
    errors::{FlashStackError, FlashStackResult},
    types::Principal,
    BTreeSet,
};

// ============================================================================
// Admin Gate
// ============================================================================

/// Fail with `UNAUTHORIZED` unless `caller` is the current admin
pub fn require_admin(config: &ProtocolConfig, caller: &Principal) -> FlashStackResult<()> {
    check!(*caller == config.admin, FlashStackError::Unauthorized);
    Ok(())
}

/// Check if `caller` is the current admin
pub fn is_admin(config: &ProtocolConfig, caller: &Principal) -> bool {
    *caller == config.admin
}

// ============================================================================
// Receiver Whitelist
// ============================================================================

/// Set of receivers eligible for flash loans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ReceiverWhitelist {
    receivers: BTreeSet<Principal>,
}

impl ReceiverWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_approved(&self, receiver: &Principal) -> bool {
        self.receivers.contains(receiver)
    }

    /// Add a receiver. Returns true if membership changed.
    pub fn approve(&mut self, receiver: Principal) -> bool {
        self.receivers.insert(receiver)
    }

    /// Remove a receiver. Returns true if membership changed.
    pub fn remove(&mut self, receiver: &Principal) -> bool {
        self.receivers.remove(receiver)
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.receivers.iter()
    }
}

/// Fail with `RECEIVER_NOT_APPROVED` unless `receiver` is whitelisted
pub fn require_approved_receiver(config: &ProtocolConfig, receiver: &Principal) -> FlashStackResult<()> {
    check!(
        config.approved_receivers.is_approved(receiver),
        FlashStackError::ReceiverNotApproved { receiver: *receiver }
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
