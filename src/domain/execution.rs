//! Fill simulation: slippage, fees, risk-based sizing, and position
//! open/close against the account.

use chrono::NaiveDateTime;

use super::account::Account;
use super::position::{ExitReason, Position, Side, Trade};
use super::signal::TradeSetup;

/// Execution parameters. Rates are fractions, not percentages: a 0.1% fee
/// is `fee_pct = 0.001`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionConfig {
    pub fee_pct: f64,
    pub slippage_pct: f64,
    pub risk_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            fee_pct: 0.001,
            slippage_pct: 0.0005,
            risk_pct: 0.02,
        }
    }
}

/// Slippage always works against the trader: buys (long entry, short cover)
/// fill higher, sells (short entry, long exit) fill lower.
pub fn apply_slippage_buy(price: f64, slippage_pct: f64) -> f64 {
    price * (1.0 + slippage_pct)
}

pub fn apply_slippage_sell(price: f64, slippage_pct: f64) -> f64 {
    price * (1.0 - slippage_pct)
}

/// Result of a sizing attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    Size(f64),
    /// Entry and stop coincide; risk-based sizing would divide by zero.
    DegenerateRisk,
    /// Balance is gone (or the clipped size collapsed to zero).
    InsufficientCapital,
}

/// Risk-based position size: risk `risk_pct` of the balance against the
/// entry-to-stop distance, then clip to what the balance can actually buy
/// once the entry fee is accounted for.
pub fn size_position(
    balance: f64,
    setup: &TradeSetup,
    price: f64,
    config: &ExecutionConfig,
) -> Sizing {
    if balance <= 0.0 {
        return Sizing::InsufficientCapital;
    }

    let risk_amount = balance * config.risk_pct;
    let price_risk = (setup.entry - setup.stop_loss).abs();
    if price_risk == 0.0 {
        return Sizing::DegenerateRisk;
    }

    let mut size = risk_amount / price_risk;

    let max_cost = balance / (1.0 + config.fee_pct);
    let cost = size * price;
    if cost > max_cost {
        size = max_cost / price;
    }

    if size <= 0.0 {
        return Sizing::InsufficientCapital;
    }

    Sizing::Size(size)
}

/// Result of an entry attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryResult {
    Entered,
    DegenerateRisk,
    InsufficientCapital,
}

/// Open a position at the bar's close. Sizing happens at the unslipped
/// price; the fill itself is slipped against the trader, and a short
/// escrows the full notional plus fee as collateral.
pub fn open_position(
    account: &mut Account,
    side: Side,
    market_price: f64,
    setup: &TradeSetup,
    timestamp: NaiveDateTime,
    config: &ExecutionConfig,
) -> EntryResult {
    debug_assert!(account.is_flat());

    let size = match size_position(account.balance, setup, market_price, config) {
        Sizing::Size(s) => s,
        Sizing::DegenerateRisk => return EntryResult::DegenerateRisk,
        Sizing::InsufficientCapital => return EntryResult::InsufficientCapital,
    };

    let execution_price = match side {
        Side::Long => apply_slippage_buy(market_price, config.slippage_pct),
        Side::Short => apply_slippage_sell(market_price, config.slippage_pct),
    };

    let cost = execution_price * size;
    let fee = cost * config.fee_pct;
    let total_cost = cost + fee;

    // Slippage can push the fill past what the balance covers.
    if total_cost > account.balance {
        return EntryResult::InsufficientCapital;
    }

    account.balance -= total_cost;
    account.position = Some(Position {
        side,
        entry_price: execution_price,
        size,
        stop_loss: setup.stop_loss,
        initial_stop_loss: setup.stop_loss,
        take_profit: setup.take_profit,
        entry_time: timestamp,
    });

    EntryResult::Entered
}

/// Close the open position at the touched level, settle cash and append the
/// trade to the ledger. Net PnL charges the fee on both entry and exit
/// notional.
pub fn close_position(
    account: &mut Account,
    exit_level: f64,
    timestamp: NaiveDateTime,
    reason: ExitReason,
    config: &ExecutionConfig,
) -> Option<Trade> {
    let position = account.position.take()?;

    let (execution_price, gross_pnl) = match position.side {
        Side::Long => {
            let price = apply_slippage_sell(exit_level, config.slippage_pct);
            (price, (price - position.entry_price) * position.size)
        }
        Side::Short => {
            let price = apply_slippage_buy(exit_level, config.slippage_pct);
            (price, (position.entry_price - price) * position.size)
        }
    };

    let exit_notional = execution_price * position.size;
    let exit_fee = exit_notional * config.fee_pct;

    match position.side {
        Side::Long => {
            account.balance += exit_notional - exit_fee;
        }
        Side::Short => {
            // Margin release and PnL in one move: the escrowed entry
            // notional comes back, minus the cost of the buy-back.
            account.balance += 2.0 * position.entry_value() - exit_notional - exit_fee;
        }
    }

    let entry_fee = position.entry_value() * config.fee_pct;
    let net_pnl = gross_pnl - entry_fee - exit_fee;
    let pnl_pct = (net_pnl / position.entry_value()) * 100.0;

    let trade = Trade {
        entry_time: position.entry_time,
        exit_time: timestamp,
        entry_price: position.entry_price,
        exit_price: execution_price,
        side: position.side,
        size: position.size,
        pnl: net_pnl,
        pnl_pct,
        reason,
    };

    account.record_trade(trade.clone());
    Some(trade)
}
