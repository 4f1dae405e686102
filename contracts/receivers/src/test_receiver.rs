//! Minimal receiver used to exercise the settlement path.

use flashstack_common::{CallbackContext, CallbackReceipt, FlashReceiver, FlashStackResult};

/// Confirms repayment with its current balance and counts invocations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReceiver {
    calls: u64,
}

impl TestReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settled callbacks handled so far
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl FlashReceiver for TestReceiver {
    fn execute_flash(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        _amount: u64,
        _fee: u64,
    ) -> FlashStackResult<CallbackReceipt> {
        self.calls += 1;
        Ok(CallbackReceipt::repaid(ctx.balance()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, funded_ledger};

    #[test]
    fn test_reports_balance() {
        let mut ledger = funded_ledger(100_050_000);
        let mut ctx = context(&mut ledger);
        let mut receiver = TestReceiver::new();

        let receipt = receiver.execute_flash(&mut ctx, 100_000_000, 50_000).unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.funds_available, 100_050_000);
        assert_eq!(receiver.calls(), 1);
    }
}
