//! Leverage Receiver
//!
//! Flash-borrows `capital * (leverage - 1)` to deposit alongside the
//! user's own capital in a stacking vault. The vault side is off-ledger
//! here; the receiver tracks operations and repays from its balance.
//!
//! ## Benefit model
//!
//! ```text
//! total_capital     = user_capital * leverage
//! flash_loan_amount = user_capital * (leverage - 1)
//! gross_yield       = total_capital * vault_apy_bps / 10_000
//! flash_cost        = flash_loan_amount * flash_fee_bp / 10_000
//! net_apy_bps       = (gross_yield - flash_cost) * 10_000 / user_capital
//! apy_boost         = net_apy_bps - vault_apy_bps
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use flashstack_common::{
    constants::fees::BPS_DENOMINATOR, CallbackContext, CallbackReceipt, FlashReceiver,
    FlashStackResult, Principal,
};

/// Result of `calculate_leverage_benefit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LeverageBenefit {
    pub user_capital: u64,
    pub leverage: u64,
    pub total_capital: u64,
    pub flash_loan_amount: u64,
    pub gross_yield: u64,
    pub flash_cost: u64,
    pub net_apy_bps: u64,
    pub apy_boost: u64,
    pub profitable: bool,
}

fn clamp(value: u128) -> u64 {
    value.min(u64::MAX as u128) as u64
}

/// Project the yield of a leveraged vault position. Pure.
pub fn calculate_leverage_benefit(
    user_capital: u64,
    leverage: u64,
    vault_apy_bps: u64,
    flash_fee_bp: u64,
) -> LeverageBenefit {
    let capital = user_capital as u128;
    let denominator = BPS_DENOMINATOR as u128;

    let total_capital = capital * leverage as u128;
    let flash_loan_amount = capital * leverage.saturating_sub(1) as u128;
    let gross_yield = total_capital * vault_apy_bps as u128 / denominator;
    let flash_cost = flash_loan_amount * flash_fee_bp as u128 / denominator;

    let net_apy_bps = if capital == 0 {
        0
    } else {
        gross_yield.saturating_sub(flash_cost) * denominator / capital
    };
    let apy_boost = if capital == 0 {
        0
    } else {
        net_apy_bps.saturating_sub(vault_apy_bps as u128)
    };

    LeverageBenefit {
        user_capital,
        leverage,
        total_capital: clamp(total_capital),
        flash_loan_amount: clamp(flash_loan_amount),
        gross_yield: clamp(gross_yield),
        flash_cost: clamp(flash_cost),
        net_apy_bps: clamp(net_apy_bps),
        apy_boost: clamp(apy_boost),
        profitable: apy_boost > 0,
    }
}

/// Running totals, only advanced by settled callbacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LeverageStats {
    pub total_operations: u64,
    pub total_volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeverageReceiver {
    owner: Principal,
    stats: LeverageStats,
}

impl LeverageReceiver {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            stats: LeverageStats::default(),
        }
    }

    pub fn get_owner(&self) -> Principal {
        self.owner
    }

    pub fn get_stats(&self) -> LeverageStats {
        self.stats
    }
}

impl FlashReceiver for LeverageReceiver {
    fn execute_flash(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        amount: u64,
        _fee: u64,
    ) -> FlashStackResult<CallbackReceipt> {
        self.stats.total_operations = self.stats.total_operations.saturating_add(1);
        self.stats.total_volume = self.stats.total_volume.saturating_add(amount);
        Ok(CallbackReceipt::repaid(ctx.balance()))
    }
}
