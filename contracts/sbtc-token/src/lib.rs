//! sBTC Token Contract
//!
//! Fungible ledger for the synthetic asset that FlashStack flash-mints.
//! Only the contract owner and the registered flash minter can create or
//! destroy supply; anyone can move their own balance.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use flashstack_common::{
    constants::token,
    errors::{FlashStackError, FlashStackResult},
    token_ops::TokenLedger,
    types::Principal,
};

// ============ Supply Tracking ============

/// Supply counters; `total_supply == total_minted - total_burned`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenSupply {
    pub total_supply: u64,
    /// Cumulative minted since deployment
    pub total_minted: u64,
    /// Cumulative burned since deployment
    pub total_burned: u64,
}

// ============ Token State ============

/// sBTC ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct SbtcToken {
    /// Deployer; may mint, burn, and register the flash minter
    owner: Principal,
    /// Settlement engine allowed to mint and burn
    flash_minter: Option<Principal>,
    balances: BTreeMap<Principal, u64>,
    supply: TokenSupply,
}

// No Default: the owner must be chosen explicitly.

impl SbtcToken {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            flash_minter: None,
            balances: BTreeMap::new(),
            supply: TokenSupply::default(),
        }
    }

    pub fn name() -> &'static str {
        token::NAME
    }

    pub fn symbol() -> &'static str {
        token::SYMBOL
    }

    pub fn decimals() -> u8 {
        token::DECIMALS
    }

    pub fn owner(&self) -> Principal {
        self.owner
    }

    pub fn flash_minter(&self) -> Option<Principal> {
        self.flash_minter
    }

    pub fn supply(&self) -> TokenSupply {
        self.supply
    }

    /// Register the engine allowed to mint and burn (owner only)
    pub fn set_flash_minter(&mut self, caller: &Principal, minter: Principal) -> FlashStackResult<()> {
        if *caller != self.owner {
            return Err(FlashStackError::TokenNotAuthorized);
        }
        self.flash_minter = Some(minter);
        Ok(())
    }

    fn can_mint(&self, caller: &Principal) -> bool {
        *caller == self.owner || self.flash_minter.as_ref() == Some(caller)
    }

    fn debit(&mut self, from: &Principal, amount: u64) -> FlashStackResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(FlashStackError::TokenInsufficientBalance {
                available,
                requested: amount,
            });
        }
        let remaining = available - amount;
        if remaining == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        Ok(())
    }

    fn credit(&mut self, to: &Principal, amount: u64) -> FlashStackResult<()> {
        let current = self.balance_of(to);
        let updated = current
            .checked_add(amount)
            .ok_or(FlashStackError::TokenInsufficientBalance {
                available: current,
                requested: amount,
            })?;
        self.balances.insert(*to, updated);
        Ok(())
    }
}

fn require_nonzero(amount: u64) -> FlashStackResult<()> {
    if amount == 0 {
        return Err(FlashStackError::TokenInsufficientBalance {
            available: 0,
            requested: 0,
        });
    }
    Ok(())
}

// ============ Ledger Operations ============

impl TokenLedger for SbtcToken {
    fn balance_of(&self, owner: &Principal) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.supply.total_supply
    }

    fn mint(&mut self, caller: &Principal, amount: u64, to: &Principal) -> FlashStackResult<()> {
        if !self.can_mint(caller) {
            return Err(FlashStackError::TokenNotAuthorized);
        }
        require_nonzero(amount)?;

        let new_supply = self
            .supply
            .total_supply
            .checked_add(amount)
            .ok_or(FlashStackError::TokenInsufficientBalance {
                available: self.supply.total_supply,
                requested: amount,
            })?;

        self.credit(to, amount)?;
        self.supply.total_supply = new_supply;
        self.supply.total_minted = self.supply.total_minted.saturating_add(amount);
        Ok(())
    }

    fn burn(&mut self, caller: &Principal, amount: u64, from: &Principal) -> FlashStackResult<()> {
        if !self.can_mint(caller) {
            return Err(FlashStackError::TokenNotAuthorized);
        }
        require_nonzero(amount)?;

        self.debit(from, amount)?;
        // Balances never exceed supply, so the debit bounds this
        self.supply.total_supply = self.supply.total_supply.saturating_sub(amount);
        self.supply.total_burned = self.supply.total_burned.saturating_add(amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        caller: &Principal,
        amount: u64,
        from: &Principal,
        to: &Principal,
    ) -> FlashStackResult<()> {
        if caller != from {
            return Err(FlashStackError::TokenNotAuthorized);
        }
        require_nonzero(amount)?;
        if from == to {
            let available = self.balance_of(from);
            if available < amount {
                return Err(FlashStackError::TokenInsufficientBalance {
                    available,
                    requested: amount,
                });
            }
            return Ok(());
        }

        self.debit(from, amount)?;
        self.credit(to, amount)
    }
}

// ============ Helper Functions ============

/// Split an amount into whole and fractional units
pub fn format_amount(amount: u64) -> (u64, u64) {
    (amount / token::ONE, amount % token::ONE)
}

// ============ Tests ============
