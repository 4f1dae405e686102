//! FlashStack Common Library
//!
//! Shared types, constants, and utilities for the FlashStack contracts.
//!
//! FlashStack lets a borrower flash-mint synthetic BTC (sBTC) inside a
//! single atomic unit: the minted supply is handed to a whitelisted
//! receiver, and principal plus fee must be burned before the unit may
//! finalize. Eligibility depends on collateral locked elsewhere (300%).
//!
//! ## Contents
//!
//! - **Constants**: Token metadata, fee and limit defaults, error codes
//! - **Errors**: Typed protocol errors with stable numeric codes
//! - **Config**: Admin-mutable protocol parameters with validated setters
//! - **Math**: Fee and collateral calculators
//! - **Circuit Breakers**: Pause switch, per-loan and per-block ceilings
//! - **Access Control**: Admin gate and receiver whitelist
//! - **Token Ops**: Ledger and collateral oracle collaborator traits
//! - **Flash**: Receiver callback capability and settlement phases
//! - **Events**: Indexable protocol events
//!
//! This crate is `no_std` compatible when built without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
#[cfg(feature = "std")]
pub use std::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

pub mod constants;
pub mod errors;
pub mod types;
pub mod config;
pub mod math;
pub mod validation;
pub mod circuit_breaker;
pub mod access_control;
pub mod token_ops;
pub mod flash;
pub mod events;

// Re-exports for convenience
pub use errors::*;
pub use types::*;
pub use config::ProtocolConfig;
pub use math::*;
pub use circuit_breaker::*;
pub use access_control::*;
pub use token_ops::*;
pub use flash::*;
pub use events::*;
