//! Mathematical Utilities for FlashStack Protocol
//!
//! Fee and collateral calculators. All pure; intermediate products are
//! computed in u128 so no input in u64 range can overflow.

use crate::constants::{collateral::COLLATERAL_RATIO, fees::BPS_DENOMINATOR};
use crate::errors::{FlashStackError, FlashStackResult};

/// Flash fee for `amount` at `fee_bps` basis points
///
/// fee = floor(amount * fee_bps / 10_000), truncating toward zero.
pub fn calculate_fee(amount: u64, fee_bps: u64) -> u64 {
    let fee = (amount as u128) * (fee_bps as u128) / (BPS_DENOMINATOR as u128);
    fee.min(u64::MAX as u128) as u64
}

/// Collateral that must be locked to borrow `loan_amount`
///
/// Saturates at `u64::MAX` for display. Eligibility goes through
/// [`covers_collateral`], which compares the exact product.
pub fn min_collateral(loan_amount: u64) -> u64 {
    loan_amount.saturating_mul(COLLATERAL_RATIO)
}

/// Whether `locked` is at least 3x `loan_amount`, computed in u128
pub fn covers_collateral(locked: u64, loan_amount: u64) -> bool {
    (locked as u128) >= (loan_amount as u128) * (COLLATERAL_RATIO as u128)
}

/// Largest loan that `locked_collateral` supports
pub fn max_flash_amount(locked_collateral: u64) -> u64 {
    locked_collateral / COLLATERAL_RATIO
}

/// Principal plus fee, the amount that must be burned at settlement
pub fn total_owed(amount: u64, fee: u64) -> FlashStackResult<u64> {
    amount.checked_add(fee).ok_or(FlashStackError::LoanTooLarge {
        amount,
        maximum: u64::MAX - fee,
    })
}
