//! Validation Helpers for FlashStack Protocol
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flashstack_common::validation::check;
//!
//! check!(!config.paused, FlashStackError::Paused);
//! ```

use crate::errors::{AmountErrorReason, FlashStackError, FlashStackResult};

/// Check a condition and return an error if it fails.
///
/// # Examples
///
/// ```rust,ignore
/// check!(
///     amount <= maximum,
///     FlashStackError::LoanTooLarge { amount, maximum }
/// );
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use check;

/// Reject zero amounts with `INVALID_AMOUNT`
pub fn require_positive(amount: u64) -> FlashStackResult<u64> {
    check!(
        amount > 0,
        FlashStackError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        }
    );
    Ok(amount)
}
