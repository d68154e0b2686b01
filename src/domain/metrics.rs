//! Post-run metrics: ROI, drawdown, win rate, profit factor, Sharpe and the
//! buy & hold benchmark, aggregated from the account's ledgers.

use super::account::{Account, EquityPoint};
use super::position::Trade;
use super::simulator::BacktestConfig;

/// Reported when the run has trades but no losing ones, where the true
/// profit factor is unbounded.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

/// Aggregated outcome of one backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub initial_capital: f64,
    pub final_equity: f64,
    /// Percent return on initial capital.
    pub roi: f64,
    /// Deepest peak-to-trough equity decline, percent. Zero or negative.
    pub max_drawdown: f64,
    pub total_trades: usize,
    /// Percent of closed trades with positive net PnL.
    pub win_rate: f64,
    pub profit_factor: f64,
    /// Annualized mean-over-stdev of per-bar equity returns.
    pub sharpe_ratio: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub benchmark_curve: Vec<EquityPoint>,
}

impl RunResult {
    pub fn compute(account: &Account, config: &BacktestConfig) -> Self {
        let final_equity = account
            .equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(account.initial_capital);
        let roi = (final_equity - account.initial_capital) / account.initial_capital * 100.0;

        let total_trades = account.trades.len();
        let wins = account.trades.iter().filter(|t| t.pnl > 0.0).count();
        let win_rate = if total_trades > 0 {
            wins as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        RunResult {
            initial_capital: account.initial_capital,
            final_equity,
            roi,
            max_drawdown: max_drawdown(&account.equity_curve),
            total_trades,
            win_rate,
            profit_factor: profit_factor(&account.trades),
            sharpe_ratio: sharpe_ratio(
                &account.equity_curve,
                config.timeframe.periods_per_year(),
            ),
            trades: account.trades.clone(),
            equity_curve: account.equity_curve.clone(),
            benchmark_curve: account.benchmark_curve.clone(),
        }
    }

    /// Percent return of holding the benchmark for the sampled window.
    pub fn benchmark_roi(&self) -> f64 {
        match self.benchmark_curve.last() {
            Some(last) => (last.equity - self.initial_capital) / self.initial_capital * 100.0,
            None => 0.0,
        }
    }
}

/// Deepest drop from a running equity peak, as a percentage. A curve that
/// never dips below its peak reports 0.
fn max_drawdown(curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < worst {
                worst = dd;
            }
        }
    }
    worst
}

/// Gross profits over gross losses. Losses include zero-PnL trades, and
/// any ledger with no losses at all (including an empty one) reports the
/// sentinel cap rather than dividing by zero.
fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl <= 0.0)
        .map(|t| t.pnl.abs())
        .sum();

    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else {
        PROFIT_FACTOR_CAP
    }
}

/// Annualized Sharpe over per-bar equity returns, zero risk-free rate.
/// Uses the sample standard deviation; fewer than two returns, or a flat
/// curve, yields 0.
fn sharpe_ratio(curve: &[EquityPoint], periods_per_year: f64) -> f64 {
    let returns: Vec<f64> = curve
        .windows(2)
        .filter(|w| w[0].equity != 0.0)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / (returns.len() - 1) as f64;
    let std = variance.sqrt();

    if std > 0.0 {
        mean / std * periods_per_year.sqrt()
    } else {
        0.0
    }
}
