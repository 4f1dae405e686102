//! Flash Minting Module for FlashStack
//!
//! A flash mint issues sBTC that must be repaid, principal plus fee, and
//! destroyed within the same atomic unit. This module holds the pieces of
//! that cycle that do not depend on a concrete ledger:
//!
//! - [`LoanAttempt::evaluate`] - the eligibility checks, in their fixed order
//! - [`FlashReceiver`] - the callback capability a receiver implements
//! - [`CallbackContext`] - what a receiver can see and do mid-settlement
//! - [`SettlementPhase`] - the settlement state machine
//!
//! ## Settlement Cycle
//!
//! ```text
//! Idle -> Validating -> Minted -> AwaitingCallback -> Settled
//!             |            |             |
//!             +------------+-------------+-------> Aborted
//! ```
//!
//! Validation failures happen before anything is staged. Failures after
//! the mint discard the staged unit, so an aborted attempt leaves no trace.

use core::any::Any;

use crate::{
    access_control::require_approved_receiver,
    circuit_breaker::{check_block_volume, check_single_loan, ensure_not_paused, BlockVolumeLedger},
    config::ProtocolConfig,
    errors::{FlashStackError, FlashStackResult},
    math::{calculate_fee, covers_collateral, min_collateral, total_owed},
    token_ops::{CollateralOracle, TokenLedger},
    types::{BlockHeight, CallContext, Principal},
    validation::require_positive,
    Box,
};

// ============ Settlement State Machine ============

/// Phase of a single flash-mint settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementPhase {
    Idle,
    Validating,
    Minted,
    AwaitingCallback,
    Settled,
    Aborted,
}

impl SettlementPhase {
    /// Whether the machine may move from `self` to `next`
    pub fn can_transition_to(self, next: SettlementPhase) -> bool {
        use SettlementPhase::*;
        match (self, next) {
            (Idle, Validating) => true,
            (Validating, Minted) => true,
            (Minted, AwaitingCallback) => true,
            (AwaitingCallback, Settled) => true,
            (Validating | Minted | AwaitingCallback, Aborted) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SettlementPhase::Settled | SettlementPhase::Aborted)
    }
}

// ============ Loan Attempt ============

/// A request that passed every eligibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanAttempt {
    /// Principal requested
    pub amount: u64,
    /// Receiver that will handle the funds
    pub receiver: Principal,
    /// Caller requesting the loan
    pub borrower: Principal,
    /// Fee owed on top of principal
    pub fee: u64,
    /// Collateral the borrower needed
    pub min_collateral: u64,
    /// Height the attempt is evaluated at
    pub block_height: BlockHeight,
}

impl LoanAttempt {
    /// Run the eligibility checks in order and build the attempt.
    ///
    /// Order: pause, zero amount, whitelist, single-loan ceiling,
    /// block-volume ceiling, collateral. Nothing is mutated.
    pub fn evaluate<O: CollateralOracle + ?Sized>(
        config: &ProtocolConfig,
        volumes: &BlockVolumeLedger,
        oracle: &O,
        ctx: &CallContext,
        amount: u64,
        receiver: &Principal,
    ) -> FlashStackResult<Self> {
        ensure_not_paused(config)?;
        require_positive(amount)?;
        require_approved_receiver(config, receiver)?;
        check_single_loan(config, amount)?;
        check_block_volume(config, volumes, ctx.block_height, amount)?;

        let required = min_collateral(amount);
        let locked = oracle
            .locked_collateral(&ctx.sender)
            .map_err(|_| FlashStackError::CollateralQueryFailed)?;
        if !covers_collateral(locked, amount) {
            return Err(FlashStackError::NotEnoughCollateral { locked, required });
        }

        let fee = calculate_fee(amount, config.fee_basis_points);
        total_owed(amount, fee)?;

        Ok(Self {
            amount,
            receiver: *receiver,
            borrower: ctx.sender,
            fee,
            min_collateral: required,
            block_height: ctx.block_height,
        })
    }

    /// Principal plus fee
    pub fn total_owed(&self) -> u64 {
        self.amount.saturating_add(self.fee)
    }
}

// ============ Receiver Callback ============

/// What a receiver reports back after handling a flash loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackReceipt {
    /// Receiver's own verdict on its operation
    pub success: bool,
    /// Amount the receiver says it holds for repayment
    pub funds_available: u64,
}

impl CallbackReceipt {
    pub fn repaid(funds_available: u64) -> Self {
        Self { success: true, funds_available }
    }

    pub fn failed() -> Self {
        Self { success: false, funds_available: 0 }
    }

    /// Whether this receipt covers `owed`
    pub fn covers(&self, owed: u64) -> bool {
        self.success && self.funds_available >= owed
    }
}

/// View of the staged ledger handed to a receiver during its callback.
///
/// The receiver acts as itself: transfers always debit the receiver. The
/// context does not expose the engine, so a receiver cannot start a second
/// flash loan inside the first.
pub struct CallbackContext<'a> {
    ledger: &'a mut dyn TokenLedger,
    receiver: Principal,
    borrower: Principal,
    block_height: BlockHeight,
}

impl<'a> CallbackContext<'a> {
    pub fn new(
        ledger: &'a mut dyn TokenLedger,
        receiver: Principal,
        borrower: Principal,
        block_height: BlockHeight,
    ) -> Self {
        Self { ledger, receiver, borrower, block_height }
    }

    pub fn receiver(&self) -> Principal {
        self.receiver
    }

    pub fn borrower(&self) -> Principal {
        self.borrower
    }

    pub fn block_height(&self) -> BlockHeight {
        self.block_height
    }

    /// The receiver's own balance
    pub fn balance(&self) -> u64 {
        self.ledger.balance_of(&self.receiver)
    }

    pub fn balance_of(&self, owner: &Principal) -> u64 {
        self.ledger.balance_of(owner)
    }

    /// Send `amount` of the receiver's tokens to `to`
    pub fn transfer(&mut self, amount: u64, to: &Principal) -> FlashStackResult<()> {
        let receiver = self.receiver;
        self.ledger.transfer(&receiver, amount, &receiver, to)
    }
}

/// Callback capability of a flash-loan receiver.
///
/// Receivers are untrusted. The engine stages a clone of the receiver for
/// each attempt and only keeps the clone's state if the loan settles.
pub trait FlashReceiver: FlashReceiverClone {
    /// Handle `amount` of freshly minted funds; `fee` is owed on top.
    ///
    /// Any error is treated as a failed callback.
    fn execute_flash(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        amount: u64,
        fee: u64,
    ) -> FlashStackResult<CallbackReceipt>;
}

/// Object-safe cloning and inspection for boxed receivers
pub trait FlashReceiverClone {
    fn box_clone(&self) -> Box<dyn FlashReceiver>;

    fn as_any(&self) -> &dyn Any;
}

impl<T> FlashReceiverClone for T
where
    T: FlashReceiver + Clone + 'static,
{
    fn box_clone(&self) -> Box<dyn FlashReceiver> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn FlashReceiver> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const ADMIN: Principal = [1u8; 32];
    const BORROWER: Principal = [2u8; 32];
    const RECEIVER: Principal = [9u8; 32];
    const ONE_SBTC: u64 = 100_000_000;

    struct FixedOracle(BTreeMap<Principal, u64>);

    impl CollateralOracle for FixedOracle {
        fn locked_collateral(&self, owner: &Principal) -> FlashStackResult<u64> {
            Ok(self.0.get(owner).copied().unwrap_or(0))
        }
    }

    struct BrokenOracle;

    impl CollateralOracle for BrokenOracle {
        fn locked_collateral(&self, _owner: &Principal) -> FlashStackResult<u64> {
            Err(FlashStackError::CollateralQueryFailed)
        }
    }

    fn setup(locked: u64) -> (ProtocolConfig, BlockVolumeLedger, FixedOracle) {
        let mut config = ProtocolConfig::new(ADMIN);
        config.approved_receivers.approve(RECEIVER);
        let mut book = BTreeMap::new();
        book.insert(BORROWER, locked);
        (config, BlockVolumeLedger::new(), FixedOracle(book))
    }

    fn evaluate(
        config: &ProtocolConfig,
        volumes: &BlockVolumeLedger,
        oracle: &dyn CollateralOracle,
        amount: u64,
    ) -> FlashStackResult<LoanAttempt> {
        let ctx = CallContext::new(BORROWER, 100);
        LoanAttempt::evaluate(config, volumes, oracle, &ctx, amount, &RECEIVER)
    }

    #[test]
    fn test_eligible_attempt() {
        let (config, volumes, oracle) = setup(300 * ONE_SBTC);
        let attempt = evaluate(&config, &volumes, &oracle, ONE_SBTC).unwrap();

        assert_eq!(attempt.amount, ONE_SBTC);
        assert_eq!(attempt.fee, 50_000);
        assert_eq!(attempt.min_collateral, 3 * ONE_SBTC);
        assert_eq!(attempt.borrower, BORROWER);
        assert_eq!(attempt.total_owed(), ONE_SBTC + 50_000);
    }

    #[test]
    fn test_pause_checked_first() {
        let (mut config, volumes, oracle) = setup(0);
        config.paused = true;
        // Zero amount, zero collateral: pause still wins
        let result = evaluate(&config, &volumes, &oracle, 0);
        assert_eq!(result.unwrap_err().code(), 105);
    }

    #[test]
    fn test_zero_amount_before_whitelist() {
        let (mut config, volumes, oracle) = setup(0);
        config.approved_receivers.remove(&RECEIVER);
        assert_eq!(evaluate(&config, &volumes, &oracle, 0).unwrap_err().code(), 104);
        assert_eq!(evaluate(&config, &volumes, &oracle, 1).unwrap_err().code(), 106);
    }

    #[test]
    fn test_limits_before_collateral() {
        let (config, mut volumes, oracle) = setup(0);
        assert_eq!(
            evaluate(&config, &volumes, &oracle, 5_000_000_001).unwrap_err().code(),
            107
        );

        volumes.record(100, 24_000_000_000);
        assert_eq!(
            evaluate(&config, &volumes, &oracle, 1_000_000_001).unwrap_err().code(),
            108
        );
        assert_eq!(
            evaluate(&config, &volumes, &oracle, 1_000_000_000).unwrap_err().code(),
            100
        );
    }

    #[test]
    fn test_collateral_boundary() {
        let (config, volumes, oracle) = setup(299_999_999);
        let result = evaluate(&config, &volumes, &oracle, ONE_SBTC);
        assert_eq!(
            result,
            Err(FlashStackError::NotEnoughCollateral {
                locked: 299_999_999,
                required: 300_000_000,
            })
        );

        let (config, volumes, oracle) = setup(300_000_000);
        assert!(evaluate(&config, &volumes, &oracle, ONE_SBTC).is_ok());
    }

    #[test]
    fn test_collateral_check_does_not_saturate() {
        let (mut config, volumes, _) = setup(0);
        config.max_single_loan = u64::MAX;
        config.max_block_volume = u64::MAX;
        let mut book = BTreeMap::new();
        book.insert(BORROWER, u64::MAX);
        let oracle = FixedOracle(book);

        let result = evaluate(&config, &volumes, &oracle, u64::MAX / 2);
        assert_eq!(
            result,
            Err(FlashStackError::NotEnoughCollateral {
                locked: u64::MAX,
                required: u64::MAX,
            })
        );
        assert!(evaluate(&config, &volumes, &oracle, u64::MAX / 3).is_ok());
    }

    #[test]
    fn test_oracle_failure() {
        let (config, volumes, _) = setup(0);
        let result = evaluate(&config, &volumes, &BrokenOracle, ONE_SBTC);
        assert_eq!(result, Err(FlashStackError::CollateralQueryFailed));
    }

    #[test]
    fn test_phase_transitions() {
        use SettlementPhase::*;
        assert!(Idle.can_transition_to(Validating));
        assert!(Validating.can_transition_to(Minted));
        assert!(Minted.can_transition_to(AwaitingCallback));
        assert!(AwaitingCallback.can_transition_to(Settled));
        assert!(Minted.can_transition_to(Aborted));

        assert!(!Idle.can_transition_to(Settled));
        assert!(!Validating.can_transition_to(Settled));
        assert!(!Settled.can_transition_to(Aborted));
        assert!(Settled.is_terminal() && Aborted.is_terminal());
    }

    #[test]
    fn test_callback_receipt_covers() {
        assert!(CallbackReceipt::repaid(105).covers(105));
        assert!(!CallbackReceipt::repaid(104).covers(105));
        assert!(!CallbackReceipt::failed().covers(0));
    }
}
