//! Paper-trading journal: an event-sourced session over fill events.
//!
//! The fill log is the source of truth. Holdings and average cost are
//! never stored, they are folded from the log on demand, and a session
//! can be reconstructed from a saved log via [`PaperSession::replay`].

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::signal::TradeSetup;

/// Residual holdings below this dollar value are treated as dust and do
/// not block a fresh entry.
pub const DUST_THRESHOLD_USD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillSide {
    Buy,
    Sell,
}

/// One executed paper fill. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub side: FillSide,
    pub amount: f64,
    pub price: f64,
    pub notional: f64,
    pub balance_after: f64,
}

/// Why an order was refused. The session state is untouched on rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderRejection {
    NonPositiveOrder,
    DuplicatePosition { held_value: f64 },
    InsufficientFunds { required: f64, available: f64 },
    InsufficientHoldings { requested: f64, held: f64 },
}

/// Planned stop and target for an open paper position, remembered per
/// symbol so a monitor can act on them later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub side: FillSide,
    pub setup: TradeSetup,
}

/// Folded view of one symbol's open holdings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub amount: f64,
    pub avg_cost: f64,
}

/// Unrealized position summary at a given mark price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionInfo {
    pub amount: f64,
    pub avg_cost: f64,
    pub value: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_pct: f64,
}

#[derive(Debug, Clone)]
pub struct PaperSession {
    initial_balance: f64,
    balance: f64,
    fills: Vec<Fill>,
    levels: HashMap<String, TradeLevels>,
}

impl PaperSession {
    pub fn new(initial_balance: f64) -> Self {
        PaperSession {
            initial_balance,
            balance: initial_balance,
            fills: Vec::new(),
            levels: HashMap::new(),
        }
    }

    /// Rebuild a session from a saved fill log. The balance is re-derived
    /// from the log, not trusted from the caller.
    pub fn replay(initial_balance: f64, fills: Vec<Fill>) -> Self {
        let balance = fills
            .last()
            .map(|f| f.balance_after)
            .unwrap_or(initial_balance);
        PaperSession {
            initial_balance,
            balance,
            fills,
            levels: HashMap::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Spend `notional` dollars on `symbol` at `price`. Refused while a
    /// non-dust position in the symbol is already open.
    pub fn buy(
        &mut self,
        symbol: &str,
        notional: f64,
        price: f64,
        timestamp: NaiveDateTime,
    ) -> Result<&Fill, OrderRejection> {
        if notional <= 0.0 || price <= 0.0 {
            return Err(OrderRejection::NonPositiveOrder);
        }

        let held_value = self.holding(symbol).amount * price;
        if held_value > DUST_THRESHOLD_USD {
            return Err(OrderRejection::DuplicatePosition { held_value });
        }
        if notional > self.balance {
            return Err(OrderRejection::InsufficientFunds {
                required: notional,
                available: self.balance,
            });
        }

        self.balance -= notional;
        self.fills.push(Fill {
            timestamp,
            symbol: symbol.to_string(),
            side: FillSide::Buy,
            amount: notional / price,
            price,
            notional,
            balance_after: self.balance,
        });
        Ok(self.fills.last().unwrap())
    }

    /// Sell `amount` units of `symbol` at `price`.
    pub fn sell(
        &mut self,
        symbol: &str,
        amount: f64,
        price: f64,
        timestamp: NaiveDateTime,
    ) -> Result<&Fill, OrderRejection> {
        if amount <= 0.0 || price <= 0.0 {
            return Err(OrderRejection::NonPositiveOrder);
        }

        let held = self.holding(symbol).amount;
        if amount > held {
            return Err(OrderRejection::InsufficientHoldings {
                requested: amount,
                held,
            });
        }

        let notional = amount * price;
        self.balance += notional;
        self.fills.push(Fill {
            timestamp,
            symbol: symbol.to_string(),
            side: FillSide::Sell,
            amount,
            price,
            notional,
            balance_after: self.balance,
        });
        Ok(self.fills.last().unwrap())
    }

    /// Fold the fill log into current holdings for one symbol. Buys blend
    /// the average cost, sells reduce quantity and keep it.
    pub fn holding(&self, symbol: &str) -> Holding {
        let mut amount = 0.0f64;
        let mut avg_cost = 0.0f64;
        for fill in self.fills.iter().filter(|f| f.symbol == symbol) {
            match fill.side {
                FillSide::Buy => {
                    let new_amount = amount + fill.amount;
                    avg_cost = (amount * avg_cost + fill.amount * fill.price) / new_amount;
                    amount = new_amount;
                }
                FillSide::Sell => {
                    amount = (amount - fill.amount).max(0.0);
                    if amount == 0.0 {
                        avg_cost = 0.0;
                    }
                }
            }
        }
        Holding { amount, avg_cost }
    }

    /// Unrealized position summary, or `None` for a flat or dust holding.
    pub fn position_info(&self, symbol: &str, price: f64) -> Option<PositionInfo> {
        let holding = self.holding(symbol);
        let value = holding.amount * price;
        if value <= DUST_THRESHOLD_USD {
            return None;
        }
        let cost = holding.amount * holding.avg_cost;
        let unrealized_pnl = value - cost;
        let unrealized_pnl_pct = if cost > 0.0 {
            unrealized_pnl / cost * 100.0
        } else {
            0.0
        };
        Some(PositionInfo {
            amount: holding.amount,
            avg_cost: holding.avg_cost,
            value,
            unrealized_pnl,
            unrealized_pnl_pct,
        })
    }

    pub fn set_levels(&mut self, symbol: &str, levels: TradeLevels) {
        self.levels.insert(symbol.to_string(), levels);
    }

    pub fn levels(&self, symbol: &str) -> Option<&TradeLevels> {
        self.levels.get(symbol)
    }

    pub fn clear_levels(&mut self, symbol: &str) {
        self.levels.remove(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ts(i: usize) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(i as i64)
    }

    #[test]
    fn buy_debits_balance_and_records_fill() {
        let mut session = PaperSession::new(10_000.0);
        let fill = session.buy("BTC/USDT", 1_000.0, 50_000.0, ts(0)).unwrap();
        assert!((fill.amount - 0.02).abs() < 1e-12);
        assert!((fill.balance_after - 9_000.0).abs() < f64::EPSILON);
        assert!((session.balance() - 9_000.0).abs() < f64::EPSILON);
        assert_eq!(session.fills().len(), 1);
    }

    #[test]
    fn duplicate_buy_is_rejected() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("BTC/USDT", 1_000.0, 50_000.0, ts(0)).unwrap();
        let err = session
            .buy("BTC/USDT", 500.0, 50_000.0, ts(1))
            .unwrap_err();
        assert!(matches!(err, OrderRejection::DuplicatePosition { .. }));
        // A different symbol is still open for entry.
        assert!(session.buy("ETH/USDT", 500.0, 3_000.0, ts(2)).is_ok());
    }

    #[test]
    fn dust_holding_does_not_block_entry() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("BTC/USDT", 1_000.0, 50_000.0, ts(0)).unwrap();
        // Sell almost everything: 0.000019 BTC ≈ $0.95 remains.
        session
            .sell("BTC/USDT", 0.019981, 50_000.0, ts(1))
            .unwrap();
        assert!(session.buy("BTC/USDT", 500.0, 50_000.0, ts(2)).is_ok());
    }

    #[test]
    fn overdraft_buy_is_rejected() {
        let mut session = PaperSession::new(100.0);
        let err = session
            .buy("BTC/USDT", 200.0, 50_000.0, ts(0))
            .unwrap_err();
        assert_eq!(
            err,
            OrderRejection::InsufficientFunds {
                required: 200.0,
                available: 100.0
            }
        );
        assert!((session.balance() - 100.0).abs() < f64::EPSILON);
        assert!(session.fills().is_empty());
    }

    #[test]
    fn oversell_is_rejected() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("BTC/USDT", 1_000.0, 50_000.0, ts(0)).unwrap();
        let err = session
            .sell("BTC/USDT", 0.03, 50_000.0, ts(1))
            .unwrap_err();
        assert!(matches!(
            err,
            OrderRejection::InsufficientHoldings { held, .. } if (held - 0.02).abs() < 1e-12
        ));
    }

    #[test]
    fn holding_blends_average_cost() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("ETH/USDT", 1_000.0, 2_000.0, ts(0)).unwrap(); // 0.5 @ 2000
        session.sell("ETH/USDT", 0.5, 2_000.0, ts(1)).unwrap();
        session.buy("ETH/USDT", 900.0, 3_000.0, ts(2)).unwrap(); // 0.3 @ 3000
        let holding = session.holding("ETH/USDT");
        assert!((holding.amount - 0.3).abs() < 1e-12);
        assert!((holding.avg_cost - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn sell_keeps_remaining_avg_cost() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("ETH/USDT", 1_000.0, 2_000.0, ts(0)).unwrap(); // 0.5
        session.sell("ETH/USDT", 0.2, 2_500.0, ts(1)).unwrap();
        let holding = session.holding("ETH/USDT");
        assert!((holding.amount - 0.3).abs() < 1e-12);
        assert!((holding.avg_cost - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn position_info_marks_unrealized_pnl() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("ETH/USDT", 1_000.0, 2_000.0, ts(0)).unwrap(); // 0.5
        let info = session.position_info("ETH/USDT", 2_200.0).unwrap();
        assert!((info.value - 1_100.0).abs() < 1e-9);
        assert!((info.unrealized_pnl - 100.0).abs() < 1e-9);
        assert!((info.unrealized_pnl_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn position_info_none_when_flat() {
        let session = PaperSession::new(10_000.0);
        assert!(session.position_info("BTC/USDT", 50_000.0).is_none());
    }

    #[test]
    fn replay_reconstructs_state_from_log() {
        let mut session = PaperSession::new(10_000.0);
        session.buy("BTC/USDT", 1_000.0, 50_000.0, ts(0)).unwrap();
        session.sell("BTC/USDT", 0.01, 55_000.0, ts(1)).unwrap();
        let fills = session.fills().to_vec();

        let restored = PaperSession::replay(10_000.0, fills);
        assert!((restored.balance() - session.balance()).abs() < f64::EPSILON);
        assert_eq!(restored.holding("BTC/USDT"), session.holding("BTC/USDT"));
    }

    #[test]
    fn levels_round_trip() {
        let mut session = PaperSession::new(10_000.0);
        let levels = TradeLevels {
            side: FillSide::Buy,
            setup: TradeSetup {
                entry: 100.0,
                stop_loss: 96.0,
                take_profit: 108.0,
            },
        };
        session.set_levels("BTC/USDT", levels);
        assert_eq!(session.levels("BTC/USDT"), Some(&levels));
        session.clear_levels("BTC/USDT");
        assert_eq!(session.levels("BTC/USDT"), None);
    }
}
