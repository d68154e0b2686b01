#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tidetrader::domain::error::TidetraderError;
pub use tidetrader::domain::ohlcv::Bar;
use tidetrader::domain::simulator::Timeframe;
use tidetrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
    ) -> Result<Vec<Bar>, TidetraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TidetraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TidetraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(i as i64)
}

pub fn make_bar(i: usize, close: f64) -> Bar {
    Bar {
        timestamp: ts(i),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000.0,
    }
}

/// Flat series at a fixed price with a one-unit high/low span.
pub fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n).map(|i| make_bar(i, price)).collect()
}

/// Zero-span dojis: high == low == close. Indicator-neutral, so the
/// scoring engine holds on every bar.
pub fn doji_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar {
            timestamp: ts(i),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1_000.0,
        })
        .collect()
}

/// Deterministic wavy walk: a slow drift plus two sine components, enough
/// texture to light up every indicator without randomness.
pub fn wavy_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + t * 0.05 + (t * 0.21).sin() * 4.0 + (t * 0.047).sin() * 9.0;
            let mut bar = make_bar(i, close);
            bar.volume = 1_000.0 + (t * 0.13).sin().abs() * 800.0;
            bar
        })
        .collect()
}

/// Render bars in the CSV adapter's on-disk format.
pub fn bars_to_csv(bars: &[Bar]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
