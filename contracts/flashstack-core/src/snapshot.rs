//! Protocol Snapshots
//!
//! Persistable copy of the engine's own state: configuration, statistics
//! and the block-volume audit trail. The ledger, the collateral oracle and
//! deployed receivers are separate contracts and are not included.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use flashstack_common::{
    circuit_breaker::BlockVolumeLedger,
    config::ProtocolConfig,
    errors::FlashStackResult,
    events::EventLog,
    token_ops::{CollateralOracle, TokenLedger},
    types::{Principal, ProtocolStats},
    Vec,
};

use crate::{registry::ReceiverRegistry, FlashStack};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ProtocolSnapshot {
    pub identity: Principal,
    pub config: ProtocolConfig,
    pub stats: ProtocolStats,
    pub block_volumes: BlockVolumeLedger,
}

impl ProtocolSnapshot {
    /// Borsh encoding, or `None` if the encoder fails
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        borsh::to_vec(self).ok()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

impl<L, O> FlashStack<L, O>
where
    L: TokenLedger + Clone,
    O: CollateralOracle,
{
    pub fn snapshot(&self) -> ProtocolSnapshot {
        ProtocolSnapshot {
            identity: self.identity,
            config: self.config.clone(),
            stats: self.stats,
            block_volumes: self.block_volumes.clone(),
        }
    }

    /// Rebuild an engine from a snapshot. The configuration is validated
    /// first; receivers must be deployed again and the event log starts
    /// empty.
    pub fn from_snapshot(snapshot: ProtocolSnapshot, ledger: L, oracle: O) -> FlashStackResult<Self> {
        snapshot.config.validate()?;
        Ok(Self {
            identity: snapshot.identity,
            config: snapshot.config,
            stats: snapshot.stats,
            block_volumes: snapshot.block_volumes,
            ledger,
            oracle,
            receivers: ReceiverRegistry::new(),
            events: EventLog::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashstack_receivers::TestReceiver;

    use crate::integration_tests::{harness, BORROWER, RECEIVER};

    #[test]
    fn test_snapshot_restore() {
        let mut h = harness();
        let ctx = h.ctx_at(BORROWER, 120);
        h.engine.flash_mint(&ctx, 100_000_000, &RECEIVER).unwrap();

        let bytes = h.engine.snapshot().to_bytes().unwrap();
        assert!(!bytes.is_empty());
        let snapshot = ProtocolSnapshot::from_bytes(&bytes).unwrap();
        let ledger = h.engine.ledger().clone();
        let oracle = h.engine.oracle().clone();

        let mut restored = FlashStack::from_snapshot(snapshot, ledger, oracle).unwrap();
        assert_eq!(restored.get_stats(), h.engine.get_stats());
        assert_eq!(restored.get_block_volume(120), 100_000_000);
        assert!(restored.is_approved_receiver(&RECEIVER));
        assert!(restored.events().is_empty());

        // Ids continue where the snapshot left off
        restored.deploy_receiver(RECEIVER, Box::new(TestReceiver::new()));
        let receipt = restored.flash_mint(&ctx, 100_000_000, &RECEIVER).unwrap();
        assert_eq!(receipt.flash_mint_id, 2);
        assert_eq!(restored.get_block_volume(120), 200_000_000);
    }

    #[test]
    fn test_invalid_snapshot_rejected() {
        let h = harness();
        let mut snapshot = h.engine.snapshot();
        snapshot.config.fee_basis_points = 101;

        let result = FlashStack::from_snapshot(snapshot, h.engine.ledger().clone(), h.engine.oracle().clone());
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(ProtocolSnapshot::from_bytes(&[1, 2, 3]).is_none());
    }
}
