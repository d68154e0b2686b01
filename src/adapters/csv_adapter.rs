//! CSV file data adapter.
//!
//! One file per symbol and timeframe, named `{symbol}_{timeframe}.csv`
//! with `/` in the symbol flattened to `-` (`BTC/USDT` on the 1h
//! timeframe reads from `BTC-USDT_1h.csv`). Columns: timestamp, open,
//! high, low, close, volume.

use crate::domain::error::TidetraderError;
use crate::domain::ohlcv::Bar;
use crate::domain::simulator::Timeframe;
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.replace('/', "-"), timeframe))
    }
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TidetraderError> {
    record
        .get(index)
        .ok_or_else(|| TidetraderError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TidetraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, TidetraderError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| TidetraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TidetraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| TidetraderError::Data {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp =
                NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT).map_err(|e| {
                    TidetraderError::Data {
                        reason: format!("invalid timestamp format: {}", e),
                    }
                })?;

            bars.push(Bar {
                timestamp,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TidetraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TidetraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TidetraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            // {symbol}_{timeframe}.csv
            if let Some(stem) = name_str.strip_suffix(".csv") {
                if let Some((symbol, _timeframe)) = stem.rsplit_once('_') {
                    symbols.push(symbol.replace('-', "/"));
                }
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }
}
