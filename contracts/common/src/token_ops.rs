//! Token Operations Module
//!
//! Interfaces of the two collaborators the settlement engine consumes:
//! the synthetic asset ledger and the collateral oracle.
//!
//! ## Ledger rules
//!
//! - **Mint/Burn Authorization**: only the ledger owner or the registered
//!   flash minter may create or destroy supply
//! - **Transfers**: the caller must be the sender
//! - **Conservation**: supply changes only through mint and burn

use crate::errors::FlashStackResult;
use crate::types::Principal;

/// Fungible ledger for the synthetic asset.
///
/// `caller` is the principal invoking the operation; implementations
/// decide whether it is authorized.
pub trait TokenLedger {
    /// Balance held by `owner`
    fn balance_of(&self, owner: &Principal) -> u64;

    /// Current total supply
    fn total_supply(&self) -> u64;

    /// Create `amount` new tokens for `to`
    fn mint(&mut self, caller: &Principal, amount: u64, to: &Principal) -> FlashStackResult<()>;

    /// Destroy `amount` tokens held by `from`
    fn burn(&mut self, caller: &Principal, amount: u64, from: &Principal) -> FlashStackResult<()>;

    /// Move `amount` tokens from `from` to `to`
    fn transfer(
        &mut self,
        caller: &Principal,
        amount: u64,
        from: &Principal,
        to: &Principal,
    ) -> FlashStackResult<()>;
}

/// Read-only view of collateral committed elsewhere (e.g. stacked STX).
///
/// A lookup that cannot be answered fails with `COLLATERAL_QUERY_FAILED`.
pub trait CollateralOracle {
    fn locked_collateral(&self, owner: &Principal) -> FlashStackResult<u64>;
}

/// Supply conservation across a unit of work: before + minted == after + burned
pub fn supply_conserved(supply_before: u64, supply_after: u64, minted: u64, burned: u64) -> bool {
    (supply_before as u128) + (minted as u128) == (supply_after as u128) + (burned as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_conserved() {
        // Flash cycle: mint then burn the same amount
        assert!(supply_conserved(1_000, 1_000, 105, 105));
        // Plain mint
        assert!(supply_conserved(0, 50, 50, 0));
        // Leak
        assert!(!supply_conserved(1_000, 995, 105, 105));
    }
}
