//! Semantic checks on a parsed [`BacktestConfig`], applied after the file
//! has been read so errors name the offending section and key.

use super::error::TidetraderError;
use super::simulator::BacktestConfig;

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), TidetraderError> {
    if config.symbol.trim().is_empty() {
        return Err(invalid("symbol", "must not be empty"));
    }
    if config.initial_capital <= 0.0 || !config.initial_capital.is_finite() {
        return Err(invalid("initial_capital", "must be a positive number"));
    }
    if config.execution.fee_pct < 0.0 || !config.execution.fee_pct.is_finite() {
        return Err(invalid("fee_pct", "must be zero or positive"));
    }
    if config.execution.slippage_pct < 0.0 || !config.execution.slippage_pct.is_finite() {
        return Err(invalid("slippage_pct", "must be zero or positive"));
    }
    if !(config.execution.risk_pct > 0.0 && config.execution.risk_pct < 1.0) {
        return Err(invalid("risk_pct", "must be between 0 and 1 exclusive"));
    }
    Ok(())
}

fn invalid(key: &str, reason: &str) -> TidetraderError {
    TidetraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionConfig;

    fn valid_config() -> BacktestConfig {
        BacktestConfig::default()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_backtest_config(&valid_config()).is_ok());
    }

    #[test]
    fn empty_symbol_rejected() {
        let mut config = valid_config();
        config.symbol = "  ".to_string();
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(
            err,
            TidetraderError::ConfigInvalid { ref key, .. } if key == "symbol"
        ));
    }

    #[test]
    fn non_positive_capital_rejected() {
        let mut config = valid_config();
        config.initial_capital = 0.0;
        assert!(validate_backtest_config(&config).is_err());
        config.initial_capital = f64::NAN;
        assert!(validate_backtest_config(&config).is_err());
    }

    #[test]
    fn negative_costs_rejected() {
        let mut config = valid_config();
        config.execution = ExecutionConfig {
            fee_pct: -0.001,
            ..ExecutionConfig::default()
        };
        assert!(validate_backtest_config(&config).is_err());
    }

    #[test]
    fn risk_pct_bounds() {
        let mut config = valid_config();
        config.execution.risk_pct = 0.0;
        assert!(validate_backtest_config(&config).is_err());
        config.execution.risk_pct = 1.0;
        assert!(validate_backtest_config(&config).is_err());
        config.execution.risk_pct = 0.5;
        assert!(validate_backtest_config(&config).is_ok());
    }
}
