//! Report generation port trait.

use crate::domain::error::TidetraderError;
use crate::domain::metrics::RunResult;
use crate::domain::simulator::BacktestConfig;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &RunResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), TidetraderError>;
}
