//! Locked Collateral Book
//!
//! In-process [`CollateralOracle`]: how much collateral each principal has
//! locked (stacked) outside the protocol. Principals with no entry have
//! none. The book can be switched unavailable, in which case every
//! lookup fails with `COLLATERAL_QUERY_FAILED`.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use flashstack_common::{
    errors::{FlashStackError, FlashStackResult},
    token_ops::CollateralOracle,
    types::Principal,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LockedCollateralBook {
    locked: BTreeMap<Principal, u64>,
    unavailable: bool,
}

impl LockedCollateralBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the collateral `owner` has locked
    pub fn set_locked(&mut self, owner: Principal, amount: u64) {
        if amount == 0 {
            self.locked.remove(&owner);
        } else {
            self.locked.insert(owner, amount);
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }
}

impl CollateralOracle for LockedCollateralBook {
    fn locked_collateral(&self, owner: &Principal) -> FlashStackResult<u64> {
        if self.unavailable {
            return Err(FlashStackError::CollateralQueryFailed);
        }
        Ok(self.locked.get(owner).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let book = LockedCollateralBook::new();
        assert_eq!(book.locked_collateral(&[2u8; 32]), Ok(0));
    }

    #[test]
    fn test_set_locked() {
        let mut book = LockedCollateralBook::new();
        book.set_locked([2u8; 32], 300_000_000);
        assert_eq!(book.locked_collateral(&[2u8; 32]), Ok(300_000_000));

        book.set_locked([2u8; 32], 0);
        assert_eq!(book.locked_collateral(&[2u8; 32]), Ok(0));
    }

    #[test]
    fn test_unavailable() {
        let mut book = LockedCollateralBook::new();
        book.set_locked([2u8; 32], 1);
        book.set_unavailable(true);

        let err = book.locked_collateral(&[2u8; 32]).unwrap_err();
        assert_eq!(err.code(), 109);
    }
}
