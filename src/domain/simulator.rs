//! Replay simulation engine: the bar-by-bar position state machine.
//!
//! Single-threaded and deterministic. The loop does no I/O and consults no
//! clock. Given the same bars and config it produces identical results.

use std::fmt;
use std::str::FromStr;

use super::account::Account;
use super::error::TidetraderError;
use super::execution::{close_position, open_position, ExecutionConfig};
use super::metrics::RunResult;
use super::ohlcv::Bar;
use super::position::Side;
use super::signal::{self, Signal};
use super::snapshot::MetricsSnapshot;

/// Bars consumed by indicator warm-up before the simulation may trade
/// (longest lookback: the 200-period trend filter).
pub const WARMUP_BARS: usize = 200;
/// Margin of tradable bars required on top of the warm-up window.
pub const WARMUP_MARGIN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// Annualization basis for Sharpe: 252 trading days scaled by bars per
    /// day (hourly bars → 252×24).
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Timeframe::M1 => 252.0 * 24.0 * 60.0,
            Timeframe::M5 => 252.0 * 24.0 * 12.0,
            Timeframe::M15 => 252.0 * 24.0 * 4.0,
            Timeframe::H1 => 252.0 * 24.0,
            Timeframe::H4 => 252.0 * 6.0,
            Timeframe::D1 => 252.0,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "1h" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" => Ok(Timeframe::D1),
            other => Err(format!("unknown timeframe '{other}'")),
        }
    }
}

/// Parameters for one backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub initial_capital: f64,
    pub execution: ExecutionConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            symbol: "BTC/USDT".to_string(),
            timeframe: Timeframe::H1,
            initial_capital: 10_000.0,
            execution: ExecutionConfig::default(),
        }
    }
}

/// Replay the bar sequence and produce the aggregated result.
///
/// `metrics` must align one-to-one with `bars` (the feed guarantees this;
/// mismatches are rejected). Simulation starts after the warm-up window;
/// a run shorter than warm-up plus margin is rejected outright.
pub fn run_backtest(
    bars: &[Bar],
    metrics: &[MetricsSnapshot],
    config: &BacktestConfig,
) -> Result<RunResult, TidetraderError> {
    if bars.len() != metrics.len() {
        return Err(TidetraderError::MisalignedSeries {
            bars: bars.len(),
            metrics: metrics.len(),
        });
    }

    let minimum = WARMUP_BARS + WARMUP_MARGIN;
    if bars.len() < minimum {
        return Err(TidetraderError::InsufficientData {
            symbol: config.symbol.clone(),
            bars: bars.len(),
            minimum,
        });
    }

    let mut account = Account::new(config.initial_capital);

    // Buy & hold benchmark, priced off the first bar of the input series.
    let benchmark_size = config.initial_capital / bars[0].close;

    for (bar, snapshot) in bars.iter().zip(metrics).skip(WARMUP_BARS) {
        let equity = account.mark_to_market(bar.close);
        account.record_equity(bar.timestamp, equity);
        account.record_benchmark(bar.timestamp, benchmark_size * bar.close);

        check_exit(&mut account, bar, &config.execution);

        // An exit above frees the slot; re-entry on the same bar is allowed.
        if account.is_flat() {
            check_entry(&mut account, bar, snapshot, &config.execution);
        }
    }

    Ok(RunResult::compute(&account, config))
}

/// Tighten the trailing stop against this bar, then settle any SL/TP touch.
fn check_exit(account: &mut Account, bar: &Bar, execution: &ExecutionConfig) {
    let exit = match account.position.as_mut() {
        None => return,
        Some(position) => {
            position.trail_stop(bar);
            position.resolve_exit(bar)
        }
    };

    if let Some((level, reason)) = exit {
        close_position(account, level, bar.timestamp, reason, execution);
    }
}

/// Score this bar's snapshot and open a position on an actionable signal.
/// Degenerate risk or insufficient capital skips the opportunity.
fn check_entry(
    account: &mut Account,
    bar: &Bar,
    snapshot: &MetricsSnapshot,
    execution: &ExecutionConfig,
) {
    let decision = signal::analyze(snapshot);
    let side = match decision.signal {
        Signal::Buy => Side::Long,
        Signal::Sell => Side::Short,
        Signal::Hold => return,
    };

    let setup = signal::entry_levels(
        decision.signal,
        snapshot.close,
        snapshot.atr,
        snapshot.trend_strength,
    );
    open_position(account, side, snapshot.close, &setup, bar.timestamp, execution);
}
