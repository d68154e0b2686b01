//! Simulation account: cash balance, the single open position, and the
//! append-only trade/equity ledgers.

use chrono::NaiveDateTime;

use super::position::{Position, Side, Trade};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub balance: f64,
    pub initial_capital: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub benchmark_curve: Vec<EquityPoint>,
}

impl Account {
    pub fn new(initial_capital: f64) -> Self {
        Account {
            balance: initial_capital,
            initial_capital,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            benchmark_curve: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Portfolio value at the given close. Shorts were entered by escrowing
    /// the full entry notional, so marking uses balance + 2*entry_value -
    /// current_value.
    pub fn mark_to_market(&self, close: f64) -> f64 {
        match &self.position {
            None => self.balance,
            Some(pos) => match pos.side {
                Side::Long => self.balance + pos.size * close,
                Side::Short => self.balance + 2.0 * pos.entry_value() - pos.size * close,
            },
        }
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    pub fn record_benchmark(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.benchmark_curve.push(EquityPoint { timestamp, equity });
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }
}
