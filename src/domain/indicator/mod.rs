//! Technical indicators over bar series.
//!
//! Every function returns a `Vec<Option<f64>>` the same length as its
//! input; `None` marks bars still inside the indicator's warm-up window.
//! Smoothed indicators (RSI, ATR, ADX) use Wilder's recursive average,
//! EMAs are SMA-seeded.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use adx::adx;
pub use atr::atr;
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rolling::{rolling_max, rolling_min};
pub use rsi::rsi;
pub use sma::sma;
