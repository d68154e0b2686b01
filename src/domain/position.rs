//! Open-position tracking and the closed-trade record.

use chrono::NaiveDateTime;
use std::fmt;

use super::ohlcv::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "SL"),
            ExitReason::TakeProfit => write!(f, "TP"),
        }
    }
}

/// The single open position. `initial_stop_loss` is frozen at entry and
/// defines the risk unit R for trailing-stop triggers; `stop_loss` is the
/// live level and only ever tightens.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
    pub initial_stop_loss: f64,
    pub take_profit: f64,
    pub entry_time: NaiveDateTime,
}

impl Position {
    /// Initial entry-to-stop distance (R). Zero or negative means the stop
    /// was placed on the wrong side; trailing logic ignores such positions.
    pub fn risk_unit(&self) -> f64 {
        match self.side {
            Side::Long => self.entry_price - self.initial_stop_loss,
            Side::Short => self.initial_stop_loss - self.entry_price,
        }
    }

    pub fn entry_value(&self) -> f64 {
        self.size * self.entry_price
    }

    /// Move the stop to lock in 0.5R once the bar shows a 2.5R favorable
    /// excursion. The stop never loosens.
    pub fn trail_stop(&mut self, bar: &Bar) {
        let risk = self.risk_unit();
        if risk <= 0.0 {
            return;
        }
        match self.side {
            Side::Long => {
                if bar.high >= self.entry_price + 2.5 * risk {
                    let new_sl = self.entry_price + 0.5 * risk;
                    if new_sl > self.stop_loss {
                        self.stop_loss = new_sl;
                    }
                }
            }
            Side::Short => {
                if bar.low <= self.entry_price - 2.5 * risk {
                    let new_sl = self.entry_price - 0.5 * risk;
                    if new_sl < self.stop_loss {
                        self.stop_loss = new_sl;
                    }
                }
            }
        }
    }

    /// Intrabar touch detection against the bar's extremes.
    pub fn stop_hit(&self, bar: &Bar) -> bool {
        match self.side {
            Side::Long => bar.low <= self.stop_loss,
            Side::Short => bar.high >= self.stop_loss,
        }
    }

    pub fn target_hit(&self, bar: &Bar) -> bool {
        match self.side {
            Side::Long => bar.high >= self.take_profit,
            Side::Short => bar.low <= self.take_profit,
        }
    }

    /// Resolve a bar where stop and target were both touched: exit at
    /// whichever level sits closer to the bar's open.
    pub fn resolve_exit(&self, bar: &Bar) -> Option<(f64, ExitReason)> {
        let hit_sl = self.stop_hit(bar);
        let hit_tp = self.target_hit(bar);

        match (hit_sl, hit_tp) {
            (true, true) => {
                if (bar.open - self.stop_loss).abs() < (bar.open - self.take_profit).abs() {
                    Some((self.stop_loss, ExitReason::StopLoss))
                } else {
                    Some((self.take_profit, ExitReason::TakeProfit))
                }
            }
            (true, false) => Some((self.stop_loss, ExitReason::StopLoss)),
            (false, true) => Some((self.take_profit, ExitReason::TakeProfit)),
            (false, false) => None,
        }
    }
}

/// Closed-position record, immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub side: Side,
    pub size: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub reason: ExitReason,
}
