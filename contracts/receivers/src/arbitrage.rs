//! Arbitrage Receiver
//!
//! Buys at `buy_price`, sells at `sell_price` and repays out of the
//! proceeds. A spread that does not cover the flash fee is reported as a
//! failed callback so the whole loan unwinds.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use flashstack_common::{
    constants::token::ONE, CallbackContext, CallbackReceipt, FlashReceiver, FlashStackError,
    FlashStackResult,
};

/// Outcome of an arbitrage evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ArbitrageResult {
    pub flash_amount: u64,
    pub tokens_bought: u64,
    pub proceeds: u64,
    pub gross_profit: u64,
    pub fee: u64,
    pub net_profit: u64,
    pub is_profitable: bool,
}

/// Evaluate a buy/sell round trip on `flash_amount` with `fee` owed.
///
/// Prices are quoted with 8 decimals.
pub fn process_arbitrage(
    flash_amount: u64,
    fee: u64,
    buy_price: u64,
    sell_price: u64,
) -> FlashStackResult<ArbitrageResult> {
    if buy_price == 0 {
        return Err(FlashStackError::InvalidAmount {
            amount: buy_price,
            reason: flashstack_common::AmountErrorReason::Zero,
        });
    }

    let tokens_bought = (flash_amount as u128 * ONE as u128) / buy_price as u128;
    let proceeds = (tokens_bought * sell_price as u128) / ONE as u128;
    let gross_profit = proceeds.saturating_sub(flash_amount as u128);
    let net_profit = gross_profit.saturating_sub(fee as u128);

    Ok(ArbitrageResult {
        flash_amount,
        tokens_bought: tokens_bought.min(u64::MAX as u128) as u64,
        proceeds: proceeds.min(u64::MAX as u128) as u64,
        gross_profit: gross_profit.min(u64::MAX as u128) as u64,
        fee,
        net_profit: net_profit.min(u64::MAX as u128) as u64,
        is_profitable: net_profit > 0,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrageReceiver {
    buy_price: u64,
    sell_price: u64,
    trades: u64,
    last_result: Option<ArbitrageResult>,
}

impl ArbitrageReceiver {
    pub fn new(buy_price: u64, sell_price: u64) -> Self {
        Self {
            buy_price,
            sell_price,
            trades: 0,
            last_result: None,
        }
    }

    pub fn set_prices(&mut self, buy_price: u64, sell_price: u64) {
        self.buy_price = buy_price;
        self.sell_price = sell_price;
    }

    /// Profitable trades that settled
    pub fn trades(&self) -> u64 {
        self.trades
    }

    pub fn last_result(&self) -> Option<&ArbitrageResult> {
        self.last_result.as_ref()
    }
}

impl FlashReceiver for ArbitrageReceiver {
    fn execute_flash(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        amount: u64,
        fee: u64,
    ) -> FlashStackResult<CallbackReceipt> {
        let result = process_arbitrage(amount, fee, self.buy_price, self.sell_price)?;
        if !result.is_profitable {
            return Ok(CallbackReceipt::failed());
        }

        self.trades += 1;
        self.last_result = Some(result);
        Ok(CallbackReceipt::repaid(ctx.balance()))
    }
}
