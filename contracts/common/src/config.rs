//! Protocol Configuration
//!
//! The single mutable parameter set of the protocol. Setters validate
//! their input; authorization is the caller's job (see
//! [`crate::access_control::require_admin`]).

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    access_control::ReceiverWhitelist,
    constants::{fees, limits},
    errors::{AmountErrorReason, FlashStackError, FlashStackResult},
    types::Principal,
};

/// Admin-controlled protocol parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ProtocolConfig {
    /// Owner of every privileged operation
    pub admin: Principal,
    /// Flash fee in basis points, at most `fees::MAX_FEE_BPS`
    pub fee_basis_points: u64,
    /// Pause switch for `flash_mint`
    pub paused: bool,
    /// Per-loan ceiling (inclusive)
    pub max_single_loan: u64,
    /// Per-block cumulative ceiling (inclusive)
    pub max_block_volume: u64,
    /// Receivers allowed to take flash loans
    pub approved_receivers: ReceiverWhitelist,
}

impl ProtocolConfig {
    /// Default configuration owned by `admin`
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            fee_basis_points: fees::DEFAULT_FEE_BPS,
            paused: false,
            max_single_loan: limits::DEFAULT_MAX_SINGLE_LOAN,
            max_block_volume: limits::DEFAULT_MAX_BLOCK_VOLUME,
            approved_receivers: ReceiverWhitelist::new(),
        }
    }

    pub fn set_fee_basis_points(&mut self, fee_bps: u64) -> FlashStackResult<()> {
        if fee_bps > fees::MAX_FEE_BPS {
            return Err(FlashStackError::InvalidAmount {
                amount: fee_bps,
                reason: AmountErrorReason::TooLarge,
            });
        }
        self.fee_basis_points = fee_bps;
        Ok(())
    }

    pub fn set_max_single_loan(&mut self, amount: u64) -> FlashStackResult<()> {
        self.max_single_loan = require_nonzero_limit(amount)?;
        Ok(())
    }

    pub fn set_max_block_volume(&mut self, amount: u64) -> FlashStackResult<()> {
        self.max_block_volume = require_nonzero_limit(amount)?;
        Ok(())
    }

    /// Check every invariant of a configuration loaded from outside
    pub fn validate(&self) -> FlashStackResult<()> {
        if self.fee_basis_points > fees::MAX_FEE_BPS {
            return Err(FlashStackError::InvalidAmount {
                amount: self.fee_basis_points,
                reason: AmountErrorReason::TooLarge,
            });
        }
        require_nonzero_limit(self.max_single_loan)?;
        require_nonzero_limit(self.max_block_volume)?;
        Ok(())
    }
}

fn require_nonzero_limit(amount: u64) -> FlashStackResult<u64> {
    if amount == 0 {
        return Err(FlashStackError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        });
    }
    Ok(amount)
}
