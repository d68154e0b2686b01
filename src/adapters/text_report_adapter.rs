//! Plain-text report adapter.

use crate::domain::error::TidetraderError;
use crate::domain::metrics::RunResult;
use crate::domain::simulator::BacktestConfig;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;
use std::fs;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn render(result: &RunResult, config: &BacktestConfig) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "BACKTEST RESULTS REPORT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Settings:");
        let _ = writeln!(out, "  Symbol          : {}", config.symbol);
        let _ = writeln!(out, "  Timeframe       : {}", config.timeframe);
        let _ = writeln!(
            out,
            "  Initial Capital : ${:.2}",
            config.initial_capital
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "[PERFORMANCE METRICS]");
        let _ = writeln!(out, "  Final Equity    : ${:.2}", result.final_equity);
        let _ = writeln!(out, "  ROI             : {:+.2}%", result.roi);
        let _ = writeln!(out, "  Max Drawdown    : {:.2}%", result.max_drawdown);
        let _ = writeln!(out, "  Sharpe Ratio    : {:.2}", result.sharpe_ratio);
        let _ = writeln!(out);
        let _ = writeln!(out, "[TRADE STATISTICS]");
        let _ = writeln!(out, "  Total Trades    : {}", result.total_trades);
        let _ = writeln!(out, "  Win Rate        : {:.1}%", result.win_rate);
        let _ = writeln!(out, "  Profit Factor   : {:.2}", result.profit_factor);
        let _ = writeln!(out);

        let benchmark_roi = result.benchmark_roi();
        let _ = writeln!(out, "[BENCHMARK COMPARISON (Buy & Hold)]");
        let _ = writeln!(out, "  Benchmark ROI   : {:+.2}%", benchmark_roi);
        let verdict = if result.roi > benchmark_roi {
            "Strategy OUTPERFORMED Benchmark"
        } else {
            "Strategy UNDERPERFORMED Benchmark"
        };
        let _ = writeln!(out, "  Result          : {verdict}");

        if !result.trades.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[TRADES]");
            for trade in &result.trades {
                let _ = writeln!(
                    out,
                    "  {} {} {:>5} entry {:.4} exit {:.4} pnl {:+.2} ({:+.2}%) [{}]",
                    trade.entry_time,
                    trade.exit_time,
                    trade.side.to_string(),
                    trade.entry_price,
                    trade.exit_price,
                    trade.pnl,
                    trade.pnl_pct,
                    trade.reason
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &RunResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), TidetraderError> {
        fs::write(output_path, Self::render(result, config))?;
        Ok(())
    }
}
