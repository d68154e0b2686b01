//! INI file configuration adapter.

use crate::domain::error::TidetraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    /// Load an INI file. Unreadable or malformed input surfaces as
    /// [`TidetraderError::ConfigParse`] naming the offending file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TidetraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| TidetraderError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TidetraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TidetraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[backtest]
symbol = BTC/USDT
timeframe = 1h
initial_capital = 25000
fee_pct = 0.001
risk_pct = 0.02

[data]
path = ./data

[report]
verbose = yes
";

    fn adapter() -> FileConfigAdapter {
        FileConfigAdapter::from_string(SAMPLE).unwrap()
    }

    #[test]
    fn reads_strings() {
        let a = adapter();
        assert_eq!(
            a.get_string("backtest", "symbol"),
            Some("BTC/USDT".to_string())
        );
        assert_eq!(a.get_string("data", "path"), Some("./data".to_string()));
        assert_eq!(a.get_string("backtest", "missing"), None);
    }

    #[test]
    fn reads_numbers_with_defaults() {
        let a = adapter();
        assert_eq!(a.get_int("backtest", "initial_capital", 0), 25_000);
        assert!((a.get_double("backtest", "fee_pct", 0.0) - 0.001).abs() < f64::EPSILON);
        assert!((a.get_double("backtest", "slippage_pct", 0.0005) - 0.0005).abs() < f64::EPSILON);
    }

    #[test]
    fn reads_bools() {
        let a = adapter();
        assert!(a.get_bool("report", "verbose", false));
        assert!(!a.get_bool("report", "quiet", false));
    }

    #[test]
    fn malformed_number_falls_back_to_default() {
        let a = FileConfigAdapter::from_string("[backtest]\ninitial_capital = lots\n").unwrap();
        assert!((a.get_double("backtest", "initial_capital", 10_000.0) - 10_000.0).abs()
            < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/tidetrader.ini").unwrap_err();
        match err {
            TidetraderError::ConfigParse { file, .. } => {
                assert_eq!(file, "/nonexistent/tidetrader.ini");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
