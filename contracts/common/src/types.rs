//! Core Types for FlashStack Protocol
//!
//! Data structures shared by the engine, the ledger and the receivers.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Type alias for principals (32-byte identity hash)
pub type Principal = [u8; 32];

/// Type alias for block heights
pub type BlockHeight = u64;

/// Execution context of a call: who sent it and at which height.
///
/// Every mutating entry point receives this explicitly; nothing in the
/// protocol reads an ambient sender or block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Transaction sender
    pub sender: Principal,
    /// Current block height
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(sender: Principal, block_height: BlockHeight) -> Self {
        Self { sender, block_height }
    }
}

// ============ Statistics ============

/// Protocol-wide counters, updated only by settled flash mints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ProtocolStats {
    /// Number of settled flash mints
    pub total_flash_mints: u64,
    /// Sum of settled principal
    pub total_volume: u64,
    /// Sum of settled fees
    pub total_fees_collected: u64,
}

impl ProtocolStats {
    /// Id the next settled flash mint will receive (ids start at 1)
    pub fn next_flash_mint_id(&self) -> u64 {
        self.total_flash_mints.saturating_add(1)
    }

    /// Record one settled loan
    pub fn record(&mut self, amount: u64, fee: u64) {
        self.total_flash_mints = self.total_flash_mints.saturating_add(1);
        self.total_volume = self.total_volume.saturating_add(amount);
        self.total_fees_collected = self.total_fees_collected.saturating_add(fee);
    }
}

/// Result of `get_stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub total_flash_mints: u64,
    pub total_volume: u64,
    pub total_fees_collected: u64,
    pub current_fee_bp: u64,
    pub paused: bool,
}

/// Borrowing capacity of a single principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Collateral the principal has locked
    pub locked_collateral: u64,
    /// Largest loan that collateral supports
    pub max_flash_amount: u64,
}

// ============ Settlement Receipt ============

/// Successful result of `flash_mint`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FlashMintReceipt {
    /// Sequential id, starting at 1
    pub flash_mint_id: u64,
    /// Principal handed to the receiver
    pub amount: u64,
    /// Fee charged
    pub fee: u64,
    /// Amount minted and burned (principal + fee)
    pub total_minted: u64,
    /// Caller that requested the loan
    pub borrower: Principal,
    /// Receiver that handled the funds
    pub receiver: Principal,
    /// Height the loan settled at
    pub block_height: BlockHeight,
    /// Deterministic receipt identifier
    pub receipt_id: [u8; 32],
}

/// Generate a deterministic receipt id
pub fn generate_receipt_id(borrower: &Principal, block_height: BlockHeight, flash_mint_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(borrower);
    hasher.update(block_height.to_le_bytes());
    hasher.update(flash_mint_id.to_le_bytes());
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_flash_mint_id_starts_at_one() {
        let mut stats = ProtocolStats::default();
        assert_eq!(stats.next_flash_mint_id(), 1);

        stats.record(100, 1);
        stats.record(200, 2);
        assert_eq!(stats.next_flash_mint_id(), 3);
        assert_eq!(stats.total_volume, 300);
        assert_eq!(stats.total_fees_collected, 3);
    }

    #[test]
    fn test_receipt_id_deterministic() {
        let a = generate_receipt_id(&[1u8; 32], 100, 1);
        let b = generate_receipt_id(&[1u8; 32], 100, 1);
        let c = generate_receipt_id(&[1u8; 32], 100, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
