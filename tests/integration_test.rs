//! End-to-end pipeline tests: CSV data on disk through indicators,
//! simulation and report rendering, plus the mock data port paths.

mod common;

use common::*;
use std::fs;
use tempfile::TempDir;
use tidetrader::adapters::csv_adapter::CsvAdapter;
use tidetrader::adapters::file_config_adapter::FileConfigAdapter;
use tidetrader::adapters::text_report_adapter::TextReportAdapter;
use tidetrader::cli::build_backtest_config;
use tidetrader::domain::error::TidetraderError;
use tidetrader::domain::feed;
use tidetrader::domain::simulator::{run_backtest, BacktestConfig, Timeframe};
use tidetrader::ports::data_port::DataPort;
use tidetrader::ports::report_port::ReportPort;

mod full_pipeline {
    use super::*;

    #[test]
    fn csv_to_report_flat_market() {
        let dir = TempDir::new().unwrap();
        let bars = doji_bars(300, 100.0);
        fs::write(dir.path().join("BTC-USDT_1h.csv"), bars_to_csv(&bars)).unwrap();

        let data_port = CsvAdapter::new(dir.path().to_path_buf());
        let loaded = data_port.fetch_ohlcv("BTC/USDT", Timeframe::H1).unwrap();
        assert_eq!(loaded.len(), 300);

        let snapshots = feed::enrich(&loaded);
        let config = BacktestConfig::default();
        let result = run_backtest(&loaded, &snapshots, &config).unwrap();

        assert_eq!(result.total_trades, 0);
        assert!((result.roi - 0.0).abs() < 1e-9);
        assert!((result.benchmark_roi() - 0.0).abs() < 1e-9);
        assert!((result.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((result.profit_factor - 999.0).abs() < f64::EPSILON);
        assert_eq!(result.equity_curve.len(), 100);

        let report = TextReportAdapter::render(&result, &config);
        assert!(report.contains("[PERFORMANCE METRICS]"));
        assert!(report.contains("Total Trades    : 0"));
    }

    #[test]
    fn report_file_written_via_port() {
        let dir = TempDir::new().unwrap();
        let bars = wavy_bars(400);
        let snapshots = feed::enrich(&bars);
        let config = BacktestConfig::default();
        let result = run_backtest(&bars, &snapshots, &config).unwrap();

        let out = dir.path().join("report.txt");
        TextReportAdapter
            .write(&result, &config, out.to_str().unwrap())
            .unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("BACKTEST RESULTS REPORT"));
        assert!(text.contains("Benchmark ROI"));
    }

    #[test]
    fn warm_up_window_rejects_short_history() {
        let bars = flat_bars(150, 100.0);
        let snapshots = feed::enrich(&bars);
        let config = BacktestConfig::default();
        match run_backtest(&bars, &snapshots, &config).unwrap_err() {
            TidetraderError::InsufficientData {
                symbol,
                bars,
                minimum,
            } => {
                assert_eq!(symbol, "BTC/USDT");
                assert_eq!(bars, 150);
                assert_eq!(minimum, 210);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn replays_are_deterministic() {
        let bars = wavy_bars(600);
        let snapshots = feed::enrich(&bars);
        let config = BacktestConfig::default();

        let first = run_backtest(&bars, &snapshots, &config).unwrap();
        let second = run_backtest(&bars, &snapshots, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn equity_starts_at_initial_capital() {
        let bars = wavy_bars(400);
        let snapshots = feed::enrich(&bars);
        let config = BacktestConfig::default();
        let result = run_backtest(&bars, &snapshots, &config).unwrap();

        // The first sampled bar is marked before any entry can fill.
        let first = result.equity_curve.first().unwrap();
        assert!((first.equity - config.initial_capital).abs() < 1e-9);
    }
}

mod mock_data_port {
    use super::*;

    #[test]
    fn fetch_and_list() {
        let port = MockDataPort::new()
            .with_bars("BTC/USDT", flat_bars(10, 100.0))
            .with_bars("ETH/USDT", flat_bars(5, 2_000.0));
        assert_eq!(
            port.list_symbols().unwrap(),
            vec!["BTC/USDT", "ETH/USDT"]
        );
        assert_eq!(port.fetch_ohlcv("BTC/USDT", Timeframe::H1).unwrap().len(), 10);
        assert!(port.fetch_ohlcv("SOL/USDT", Timeframe::H1).unwrap().is_empty());
    }

    #[test]
    fn configured_error_surfaces() {
        let port = MockDataPort::new().with_error("BTC/USDT", "feed offline");
        assert!(matches!(
            port.fetch_ohlcv("BTC/USDT", Timeframe::H1).unwrap_err(),
            TidetraderError::Data { ref reason } if reason == "feed offline"
        ));
    }
}

mod config_pipeline {
    use super::*;

    #[test]
    fn ini_file_drives_backtest_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tidetrader.ini");
        fs::write(
            &path,
            "[backtest]\n\
             symbol = ETH/USDT\n\
             timeframe = 4h\n\
             initial_capital = 50000\n\
             fee_pct = 0.002\n\
             slippage_pct = 0.001\n\
             risk_pct = 0.01\n",
        )
        .unwrap();

        let adapter = FileConfigAdapter::from_file(&path).unwrap();
        let config = build_backtest_config(&adapter, None, None).unwrap();
        assert_eq!(config.symbol, "ETH/USDT");
        assert_eq!(config.timeframe, Timeframe::H4);
        assert!((config.initial_capital - 50_000.0).abs() < f64::EPSILON);
        assert!((config.execution.fee_pct - 0.002).abs() < f64::EPSILON);
        assert!((config.execution.slippage_pct - 0.001).abs() < f64::EPSILON);
        assert!((config.execution.risk_pct - 0.01).abs() < f64::EPSILON);
    }
}
