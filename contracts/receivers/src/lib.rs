//! FlashStack Reference Receivers
//!
//! Contracts that accept flash-minted sBTC through the
//! [`FlashReceiver`](flashstack_common::flash::FlashReceiver) callback.
//! Each one is `Clone` so the engine can stage it for the length of a
//! settlement.
//!
//! - [`TestReceiver`] - repays with whatever it holds
//! - [`ArbitrageReceiver`] - repays only when a price spread covers the fee
//! - [`LeverageReceiver`] - stacking-vault leverage helper

pub mod arbitrage;
pub mod leverage;
pub mod test_receiver;

pub use arbitrage::{process_arbitrage, ArbitrageReceiver, ArbitrageResult};
pub use leverage::{calculate_leverage_benefit, LeverageBenefit, LeverageReceiver, LeverageStats};
pub use test_receiver::TestReceiver;
