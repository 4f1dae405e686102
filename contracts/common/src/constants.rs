//! Protocol Constants
//!
//! Defaults and fixed parameters for the FlashStack protocol. Values that
//! the admin may change at runtime live in [`crate::config::ProtocolConfig`];
//! the numbers here are only their starting points and hard bounds.

/// Synthetic asset metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Stacks Bitcoin";
    /// Token symbol
    pub const SYMBOL: &str = "sBTC";
    /// Decimal places (same as Bitcoin satoshis)
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 sBTC = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Fee Configuration (in basis points, 100 = 1%)
pub mod fees {
    /// Default flash fee (0.05%)
    pub const DEFAULT_FEE_BPS: u64 = 5;

    /// Highest fee the admin may configure (1%)
    pub const MAX_FEE_BPS: u64 = 100;

    /// Basis points denominator
    pub const BPS_DENOMINATOR: u64 = 10_000;
}

/// Circuit breaker defaults
pub mod limits {
    use super::token::ONE;

    /// Largest single flash loan (5 sBTC)
    pub const DEFAULT_MAX_SINGLE_LOAN: u64 = 5 * ONE;

    /// Largest cumulative flash volume settled in one block (25 sBTC)
    pub const DEFAULT_MAX_BLOCK_VOLUME: u64 = 25 * ONE;
}

/// Collateralization
pub mod collateral {
    /// Locked collateral must be at least this multiple of the loan (300%)
    pub const COLLATERAL_RATIO: u64 = 3;
}

/// Numeric error codes, stable across releases
pub mod error_codes {
    pub const NOT_ENOUGH_COLLATERAL: u32 = 100;
    pub const LOAN_REPAYMENT_FAILED: u32 = 101;
    pub const UNAUTHORIZED: u32 = 102;
    pub const RECEIVER_CALLBACK_FAILED: u32 = 103;
    pub const INVALID_AMOUNT: u32 = 104;
    pub const PAUSED: u32 = 105;
    pub const RECEIVER_NOT_APPROVED: u32 = 106;
    pub const LOAN_TOO_LARGE: u32 = 107;
    pub const BLOCK_VOLUME_EXCEEDED: u32 = 108;
    pub const COLLATERAL_QUERY_FAILED: u32 = 109;

    // Ledger codes
    pub const TOKEN_NOT_AUTHORIZED: u32 = 401;
    pub const TOKEN_INSUFFICIENT_BALANCE: u32 = 402;
}
