//! Circuit Breaker Module
//!
//! Hard ceilings that stop the protocol from over-extending itself, plus
//! the admin pause switch.
//!
//! ## Checks
//!
//! - **Pause**: No flash mint while the protocol is paused
//! - **Single Loan**: `amount <= max_single_loan`
//! - **Block Volume**: `block_volume[h] + amount <= max_block_volume`
//!
//! Both ceilings are inclusive. The checks are read-only; volume is only
//! recorded once a loan has settled.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    check,
    config::ProtocolConfig,
    errors::{FlashStackError, FlashStackResult},
    types::BlockHeight,
    BTreeMap,
};

// ============================================================================
// Types
// ============================================================================

/// Cumulative settled principal per block height.
///
/// Entries are created on the first settlement in a block and never
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct BlockVolumeLedger {
    volumes: BTreeMap<BlockHeight, u64>,
}

impl BlockVolumeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume settled at `height` (0 if nothing settled there)
    pub fn volume_at(&self, height: BlockHeight) -> u64 {
        self.volumes.get(&height).copied().unwrap_or(0)
    }

    /// Add settled principal to `height`
    pub fn record(&mut self, height: BlockHeight, amount: u64) {
        let entry = self.volumes.entry(height).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Number of heights with recorded volume
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Iterate `(height, volume)` in height order
    pub fn iter(&self) -> impl Iterator<Item = (BlockHeight, u64)> + '_ {
        self.volumes.iter().map(|(h, v)| (*h, *v))
    }
}

// ============================================================================
// Core Circuit Breaker Functions
// ============================================================================

/// Fail with `PAUSED` while the protocol is paused
pub fn ensure_not_paused(config: &ProtocolConfig) -> FlashStackResult<()> {
    check!(!config.paused, FlashStackError::Paused);
    Ok(())
}

/// Enforce the per-loan ceiling
pub fn check_single_loan(config: &ProtocolConfig, amount: u64) -> FlashStackResult<()> {
    check!(
        amount <= config.max_single_loan,
        FlashStackError::LoanTooLarge {
            amount,
            maximum: config.max_single_loan,
        }
    );
    Ok(())
}

/// Enforce the per-block ceiling against volume already settled at `height`
pub fn check_block_volume(
    config: &ProtocolConfig,
    ledger: &BlockVolumeLedger,
    height: BlockHeight,
    amount: u64,
) -> FlashStackResult<()> {
    let current = ledger.volume_at(height);
    let within = current
        .checked_add(amount)
        .map_or(false, |total| total <= config.max_block_volume);

    check!(
        within,
        FlashStackError::BlockVolumeExceeded {
            block_height: height,
            current,
            requested: amount,
            maximum: config.max_block_volume,
        }
    );
    Ok(())
}

/// Principal still available in `height` before the block ceiling trips
pub fn remaining_block_capacity(
    config: &ProtocolConfig,
    ledger: &BlockVolumeLedger,
    height: BlockHeight,
) -> u64 {
    config.max_block_volume.saturating_sub(ledger.volume_at(height))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProtocolConfig {
        ProtocolConfig::new([1u8; 32])
    }

    #[test]
    fn test_pause_switch() {
        let mut config = config();
        assert!(ensure_not_paused(&config).is_ok());
        config.paused = true;
        assert_eq!(ensure_not_paused(&config), Err(FlashStackError::Paused));
    }

    #[test]
    fn test_single_loan_inclusive() {
        let config = config();
        assert!(check_single_loan(&config, 5_000_000_000).is_ok());
        let result = check_single_loan(&config, 5_000_000_001);
        assert_eq!(result.unwrap_err().code(), 107);
    }

    #[test]
    fn test_block_volume_inclusive() {
        let config = config();
        let mut ledger = BlockVolumeLedger::new();
        ledger.record(10, 20_000_000_000);

        assert!(check_block_volume(&config, &ledger, 10, 5_000_000_000).is_ok());
        let result = check_block_volume(&config, &ledger, 10, 5_000_000_001);
        assert!(matches!(
            result,
            Err(FlashStackError::BlockVolumeExceeded { block_height: 10, current: 20_000_000_000, .. })
        ));

        // Other heights are unaffected
        assert!(check_block_volume(&config, &ledger, 11, 25_000_000_000).is_ok());
    }

    #[test]
    fn test_block_volume_overflow_rejected() {
        let config = config();
        let mut ledger = BlockVolumeLedger::new();
        ledger.record(1, 1);
        assert!(check_block_volume(&config, &ledger, 1, u64::MAX).is_err());
    }

    #[test]
    fn test_ledger_accumulates_lazily() {
        let mut ledger = BlockVolumeLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.volume_at(5), 0);

        ledger.record(5, 100);
        ledger.record(5, 250);
        ledger.record(7, 1);

        assert_eq!(ledger.volume_at(5), 350);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec![(5, 350), (7, 1)]);
        assert_eq!(remaining_block_capacity(&config(), &ledger, 5), 25_000_000_000 - 350);
    }
}
