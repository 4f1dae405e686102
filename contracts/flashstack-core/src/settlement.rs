//! Flash Mint Settlement
//!
//! One call to [`FlashStack::flash_mint`] runs the whole cycle:
//!
//! 1. **Validate** - eligibility checks, no state touched
//! 2. **Mint** - `amount + fee` minted to the receiver on a staged ledger
//! 3. **Call back** - a staged copy of the receiver handles the funds
//! 4. **Burn** - `amount + fee` burned from the receiver
//! 5. **Commit** - staged ledger and receiver replace the live ones; stats,
//!    block volume and the event log are updated
//!
//! The [`SettlementTransaction`] is opened from `Idle` by a successful
//! validation. Steps 2 to 4 work only on it; if any of them fails the
//! transaction is dropped and the engine is exactly as it was.

use flashstack_common::{
    errors::{FlashStackError, FlashStackResult},
    events::FlashStackEvent,
    flash::{CallbackContext, FlashReceiver, LoanAttempt, SettlementPhase},
    token_ops::{supply_conserved, CollateralOracle, TokenLedger},
    types::{generate_receipt_id, CallContext, FlashMintReceipt, Principal},
    Box,
};

use crate::FlashStack;

/// Staged effects of one flash mint, not yet visible to the engine
pub struct SettlementTransaction<L> {
    phase: SettlementPhase,
    attempt: LoanAttempt,
    /// Live supply when the transaction was opened
    supply_before: u64,
    ledger: L,
    receiver: Option<Box<dyn FlashReceiver>>,
}

impl<L: TokenLedger + Clone> SettlementTransaction<L> {
    /// Run `validate` from `Idle` and stage the ledger if it passes.
    /// Nothing is cloned for a rejected request.
    fn open(
        ledger: &L,
        validate: impl FnOnce() -> FlashStackResult<LoanAttempt>,
    ) -> FlashStackResult<Self> {
        let mut phase = SettlementPhase::Idle;
        debug_assert!(phase.can_transition_to(SettlementPhase::Validating));
        phase = SettlementPhase::Validating;

        let attempt = validate()?;
        Ok(Self {
            phase,
            attempt,
            supply_before: ledger.total_supply(),
            ledger: ledger.clone(),
            receiver: None,
        })
    }

    pub fn phase(&self) -> SettlementPhase {
        self.phase
    }

    fn advance(&mut self, next: SettlementPhase) {
        debug_assert!(self.phase.can_transition_to(next));
        self.phase = next;
    }

    /// Run `step`, marking the transaction aborted if it fails
    fn step<T>(&mut self, step: impl FnOnce(&mut Self) -> FlashStackResult<T>) -> FlashStackResult<T> {
        let result = step(self);
        if result.is_err() {
            self.advance(SettlementPhase::Aborted);
        }
        result
    }

    fn mint(&mut self, minter: &Principal) -> FlashStackResult<()> {
        self.step(|tx| {
            let total = tx.attempt.total_owed();
            tx.ledger.mint(minter, total, &tx.attempt.receiver)?;
            tx.advance(SettlementPhase::Minted);
            Ok(())
        })
    }

    fn call_back(&mut self, deployed: Option<&dyn FlashReceiver>) -> FlashStackResult<()> {
        self.step(|tx| {
            let mut handler = deployed
                .map(|r| r.box_clone())
                .ok_or(FlashStackError::ReceiverCallbackFailed)?;
            tx.advance(SettlementPhase::AwaitingCallback);

            let attempt = &tx.attempt;
            let mut ctx = CallbackContext::new(
                &mut tx.ledger,
                attempt.receiver,
                attempt.borrower,
                attempt.block_height,
            );
            let receipt = handler
                .execute_flash(&mut ctx, attempt.amount, attempt.fee)
                .map_err(|_| FlashStackError::ReceiverCallbackFailed)?;

            if !receipt.covers(attempt.total_owed()) {
                return Err(FlashStackError::ReceiverCallbackFailed);
            }
            tx.receiver = Some(handler);
            Ok(())
        })
    }

    fn burn(&mut self, burner: &Principal) -> FlashStackResult<()> {
        self.step(|tx| {
            let owed = tx.attempt.total_owed();
            let receiver = tx.attempt.receiver;
            if tx.ledger.burn(burner, owed, &receiver).is_err() {
                return Err(FlashStackError::LoanRepaymentFailed {
                    owed,
                    available: tx.ledger.balance_of(&receiver),
                });
            }
            tx.advance(SettlementPhase::Settled);
            Ok(())
        })
    }
}

impl<L, O> FlashStack<L, O>
where
    L: TokenLedger + Clone,
    O: CollateralOracle,
{
    /// Flash-mint `amount` sBTC to `receiver` on behalf of `ctx.sender`.
    ///
    /// On success the loan has been minted, used and burned, and the
    /// returned receipt carries the new flash mint id. On failure nothing
    /// has changed.
    pub fn flash_mint(
        &mut self,
        ctx: &CallContext,
        amount: u64,
        receiver: &Principal,
    ) -> FlashStackResult<FlashMintReceipt> {
        let mut tx = SettlementTransaction::open(&self.ledger, || {
            LoanAttempt::evaluate(
                &self.config,
                &self.block_volumes,
                &self.oracle,
                ctx,
                amount,
                receiver,
            )
        })?;
        tx.mint(&self.identity)?;
        tx.call_back(self.receivers.get(receiver))?;
        tx.burn(&self.identity)?;

        Ok(self.commit(tx))
    }

    fn commit(&mut self, tx: SettlementTransaction<L>) -> FlashMintReceipt {
        let SettlementTransaction { attempt, supply_before, ledger, receiver, .. } = tx;

        let owed = attempt.total_owed();
        debug_assert!(supply_conserved(supply_before, ledger.total_supply(), owed, owed));
        self.ledger = ledger;
        if let Some(handler) = receiver {
            self.receivers.commit(attempt.receiver, handler);
        }

        let flash_mint_id = self.stats.next_flash_mint_id();
        self.stats.record(attempt.amount, attempt.fee);
        self.block_volumes.record(attempt.block_height, attempt.amount);

        self.events.emit(FlashStackEvent::FlashMint {
            flash_mint_id,
            borrower: attempt.borrower,
            receiver: attempt.receiver,
            amount: attempt.amount,
            fee: attempt.fee,
            block_height: attempt.block_height,
        });

        FlashMintReceipt {
            flash_mint_id,
            amount: attempt.amount,
            fee: attempt.fee,
            total_minted: owed,
            borrower: attempt.borrower,
            receiver: attempt.receiver,
            block_height: attempt.block_height,
            receipt_id: generate_receipt_id(&attempt.borrower, attempt.block_height, flash_mint_id),
        }
    }
}
