//! Error Types for FlashStack Protocol
//!
//! Every public operation returns a definite [`FlashStackResult`]. The
//! numeric codes are part of the external interface and match
//! [`crate::constants::error_codes`].

use core::fmt;

use crate::constants::error_codes as codes;
use crate::types::Principal;

/// Result type alias for FlashStack operations
pub type FlashStackResult<T> = Result<T, FlashStackError>;

/// Main error enum for all FlashStack protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashStackError {
    // ============ Eligibility Errors ============
    /// Borrower's locked collateral is below 300% of the loan
    NotEnoughCollateral { locked: u64, required: u64 },

    /// Collateral oracle could not answer
    CollateralQueryFailed,

    // ============ Settlement Errors ============
    /// Burning principal plus fee failed
    LoanRepaymentFailed { owed: u64, available: u64 },

    /// Receiver signalled failure or did not make repayment available
    ReceiverCallbackFailed,

    // ============ Authorization Errors ============
    /// Caller is not the protocol admin
    Unauthorized,

    /// Receiver is not on the whitelist
    ReceiverNotApproved { receiver: Principal },

    // ============ Amount Errors ============
    /// Invalid amount provided
    InvalidAmount { amount: u64, reason: AmountErrorReason },

    // ============ Circuit Breaker Errors ============
    /// Protocol is paused
    Paused,

    /// Loan exceeds the single-loan ceiling
    LoanTooLarge { amount: u64, maximum: u64 },

    /// Loan would push the block's cumulative volume over the ceiling
    BlockVolumeExceeded {
        block_height: u64,
        current: u64,
        requested: u64,
        maximum: u64,
    },

    // ============ Ledger Errors ============
    /// Caller may not mint, burn or move these tokens
    TokenNotAuthorized,

    /// Balance too small (or amount zero) for a ledger operation
    TokenInsufficientBalance { available: u64, requested: u64 },
}

/// Reasons for amount-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountErrorReason {
    /// Amount is zero when non-zero required
    Zero,
    /// Amount exceeds a hard bound
    TooLarge,
}

impl FlashStackError {
    /// Stable numeric error code
    pub fn code(&self) -> u32 {
        match self {
            Self::NotEnoughCollateral { .. } => codes::NOT_ENOUGH_COLLATERAL,
            Self::LoanRepaymentFailed { .. } => codes::LOAN_REPAYMENT_FAILED,
            Self::Unauthorized => codes::UNAUTHORIZED,
            Self::ReceiverCallbackFailed => codes::RECEIVER_CALLBACK_FAILED,
            Self::InvalidAmount { .. } => codes::INVALID_AMOUNT,
            Self::Paused => codes::PAUSED,
            Self::ReceiverNotApproved { .. } => codes::RECEIVER_NOT_APPROVED,
            Self::LoanTooLarge { .. } => codes::LOAN_TOO_LARGE,
            Self::BlockVolumeExceeded { .. } => codes::BLOCK_VOLUME_EXCEEDED,
            Self::CollateralQueryFailed => codes::COLLATERAL_QUERY_FAILED,
            Self::TokenNotAuthorized => codes::TOKEN_NOT_AUTHORIZED,
            Self::TokenInsufficientBalance { .. } => codes::TOKEN_INSUFFICIENT_BALANCE,
        }
    }

    /// Symbolic name for logging/debugging
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotEnoughCollateral { .. } => "ERR_NOT_ENOUGH_COLLATERAL",
            Self::LoanRepaymentFailed { .. } => "ERR_LOAN_REPAYMENT_FAILED",
            Self::Unauthorized => "ERR_UNAUTHORIZED",
            Self::ReceiverCallbackFailed => "ERR_RECEIVER_CALLBACK_FAILED",
            Self::InvalidAmount { .. } => "ERR_INVALID_AMOUNT",
            Self::Paused => "ERR_PAUSED",
            Self::ReceiverNotApproved { .. } => "ERR_RECEIVER_NOT_APPROVED",
            Self::LoanTooLarge { .. } => "ERR_LOAN_TOO_LARGE",
            Self::BlockVolumeExceeded { .. } => "ERR_BLOCK_VOLUME_EXCEEDED",
            Self::CollateralQueryFailed => "ERR_COLLATERAL_QUERY_FAILED",
            Self::TokenNotAuthorized => "ERR_NOT_AUTHORIZED",
            Self::TokenInsufficientBalance { .. } => "ERR_INSUFFICIENT_BALANCE",
        }
    }

    /// Human-readable message for this error
    pub fn message(&self) -> &'static str {
        error_message(self.code()).unwrap_or("Unknown error")
    }
}

/// Message catalogue keyed by numeric code
pub fn error_message(code: u32) -> Option<&'static str> {
    let message = match code {
        codes::NOT_ENOUGH_COLLATERAL => "Not enough collateral locked",
        codes::LOAN_REPAYMENT_FAILED => "Loan repayment failed",
        codes::UNAUTHORIZED => "Unauthorized: admin access required",
        codes::RECEIVER_CALLBACK_FAILED => "Receiver callback failed",
        codes::INVALID_AMOUNT => "Invalid amount: must be greater than zero",
        codes::PAUSED => "Protocol is paused",
        codes::RECEIVER_NOT_APPROVED => "Receiver contract not approved",
        codes::LOAN_TOO_LARGE => "Loan exceeds single-loan limit",
        codes::BLOCK_VOLUME_EXCEEDED => "Block volume limit exceeded",
        codes::COLLATERAL_QUERY_FAILED => "Collateral query failed",
        codes::TOKEN_NOT_AUTHORIZED => "Token operation not authorized",
        codes::TOKEN_INSUFFICIENT_BALANCE => "Insufficient token balance",
        _ => return None,
    };
    Some(message)
}

impl fmt::Display for FlashStackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}: {}", self.code(), self.message())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FlashStackError {}
