//! Indicator feed: turns a bar series into per-bar [`MetricsSnapshot`]s.
//!
//! Fixed parameter set: EMA 50/200 for trend, RSI 14, MACD 12/26/9,
//! ATR 14, ADX 14, 20-bar volume SMA and 20-bar low/high extremes for
//! support and resistance. Scalars the snapshot carries as plain floats
//! fall back to neutral values while warming up; the simulator never
//! trades inside that window.

use super::indicator;
use super::ohlcv::Bar;
use super::snapshot::{MetricsSnapshot, TrendDirection, TrendStrength};

pub const EMA_FAST: usize = 50;
pub const EMA_SLOW: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;
pub const VOL_SMA_PERIOD: usize = 20;
pub const LEVEL_PERIOD: usize = 20;

const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// Compute the full indicator set and zip it into one snapshot per bar.
pub fn enrich(bars: &[Bar]) -> Vec<MetricsSnapshot> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let ema_fast = indicator::ema(&closes, EMA_FAST);
    let ema_slow = indicator::ema(&closes, EMA_SLOW);
    let rsi = indicator::rsi(&closes, RSI_PERIOD);
    let macd = indicator::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let atr = indicator::atr(bars, ATR_PERIOD);
    let adx = indicator::adx(bars, ADX_PERIOD);
    let vol_sma = indicator::sma(&volumes, VOL_SMA_PERIOD);
    let support = indicator::rolling_min(&lows, LEVEL_PERIOD);
    let resistance = indicator::rolling_max(&highs, LEVEL_PERIOD);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| MetricsSnapshot {
            close: bar.close,
            volume: bar.volume,
            vol_sma: vol_sma[i],
            rsi: rsi[i].unwrap_or(50.0),
            macd: macd.line[i].unwrap_or(0.0),
            macd_signal: macd.signal[i].unwrap_or(0.0),
            macd_hist: macd.histogram[i].unwrap_or(0.0),
            ema_50: ema_fast[i],
            ema_200: ema_slow[i],
            atr: atr[i].unwrap_or(0.0),
            trend_direction: trend_direction(ema_fast[i], ema_slow[i]),
            trend_strength: adx[i].map_or(TrendStrength::Weak, TrendStrength::from_adx),
            support: support[i],
            resistance: resistance[i],
        })
        .collect()
}

/// Fast EMA against slow EMA; Sideways until both are live or when they
/// sit exactly on top of each other.
fn trend_direction(ema_fast: Option<f64>, ema_slow: Option<f64>) -> TrendDirection {
    match (ema_fast, ema_slow) {
        (Some(fast), Some(slow)) if fast > slow => TrendDirection::Bullish,
        (Some(fast), Some(slow)) if fast < slow => TrendDirection::Bearish,
        _ => TrendDirection::Sideways,
    }
}
