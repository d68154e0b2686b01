//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::TidetraderError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::feed;
use crate::domain::ohlcv::Bar;
use crate::domain::signal::{self, Signal};
use crate::domain::simulator::{self, BacktestConfig, Timeframe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tidetrader", about = "Confluence-strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over historical candles
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score the most recent candle and print the decision
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            symbol,
            timeframe,
            output,
        } => run_backtest(
            &config,
            data.as_ref(),
            symbol.as_deref(),
            timeframe.as_deref(),
            output.as_ref(),
        ),
        Command::Analyze {
            config,
            data,
            symbol,
            timeframe,
        } => run_analyze(&config, data.as_ref(), symbol.as_deref(), timeframe.as_deref()),
        Command::ListSymbols { config, data } => run_list_symbols(config.as_ref(), data.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble a [`BacktestConfig`] from the `[backtest]` section, with CLI
/// overrides taking precedence for symbol and timeframe.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
    timeframe_override: Option<&str>,
) -> Result<BacktestConfig, TidetraderError> {
    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => adapter.get_string("backtest", "symbol").ok_or_else(|| {
            TidetraderError::ConfigMissing {
                section: "backtest".into(),
                key: "symbol".into(),
            }
        })?,
    };

    let timeframe_str = match timeframe_override {
        Some(t) => t.to_string(),
        None => adapter
            .get_string("backtest", "timeframe")
            .unwrap_or_else(|| "1h".to_string()),
    };
    let timeframe: Timeframe =
        timeframe_str
            .parse()
            .map_err(|reason| TidetraderError::ConfigInvalid {
                section: "backtest".into(),
                key: "timeframe".into(),
                reason,
            })?;

    Ok(BacktestConfig {
        symbol,
        timeframe,
        initial_capital: adapter.get_double("backtest", "initial_capital", 10_000.0),
        execution: ExecutionConfig {
            fee_pct: adapter.get_double("backtest", "fee_pct", 0.001),
            slippage_pct: adapter.get_double("backtest", "slippage_pct", 0.0005),
            risk_pct: adapter.get_double("backtest", "risk_pct", 0.02),
        },
    })
}

fn resolve_data_path(adapter: Option<&dyn ConfigPort>, data_override: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = data_override {
        return path.clone();
    }
    adapter
        .and_then(|a| a.get_string("data", "path"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn load_bars(
    data_path: PathBuf,
    config: &BacktestConfig,
) -> Result<Vec<Bar>, TidetraderError> {
    let data_port = CsvAdapter::new(data_path);
    let bars = data_port.fetch_ohlcv(&config.symbol, config.timeframe)?;
    if !crate::domain::ohlcv::is_strictly_ordered(&bars) {
        return Err(TidetraderError::Data {
            reason: format!("duplicate timestamps in {} candles", config.symbol),
        });
    }
    Ok(bars)
}

fn run_backtest(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    symbol_override: Option<&str>,
    timeframe_override: Option<&str>,
    output_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build and validate backtest config
    let bt_config = match build_backtest_config(&adapter, symbol_override, timeframe_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_backtest_config(&bt_config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Fetch candles
    let data_path = resolve_data_path(Some(&adapter), data_override);
    eprintln!(
        "Fetching {} {} candles from {}",
        bt_config.symbol,
        bt_config.timeframe,
        data_path.display()
    );
    let bars = match load_bars(data_path, &bt_config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} candles", bars.len());

    // Stage 4: Indicators
    eprintln!("Computing indicators...");
    let snapshots = feed::enrich(&bars);

    // Stage 5: Simulation
    eprintln!("Running simulation...");
    let result = match simulator::run_backtest(&bars, &snapshots, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Report
    print!("{}", TextReportAdapter::render(&result, &bt_config));

    let output = output_override
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("report", "output"));
    if let Some(output_path) = output {
        if let Err(e) = TextReportAdapter.write(&result, &bt_config, &output_path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {output_path}");
    }

    ExitCode::SUCCESS
}

fn run_analyze(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    symbol_override: Option<&str>,
    timeframe_override: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let bt_config = match build_backtest_config(&adapter, symbol_override, timeframe_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_path = resolve_data_path(Some(&adapter), data_override);
    let bars = match load_bars(data_path, &bt_config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let snapshots = feed::enrich(&bars);
    let Some(snapshot) = snapshots.last() else {
        let e = TidetraderError::Data {
            reason: format!("no candles for {}", bt_config.symbol),
        };
        eprintln!("error: {e}");
        return (&e).into();
    };

    let decision = signal::analyze(snapshot);
    println!("Symbol      : {}", bt_config.symbol);
    println!("Timeframe   : {}", bt_config.timeframe);
    println!("Close       : {:.4}", snapshot.close);
    println!("Signal      : {}", decision.signal);
    println!("Reason      : {}", decision.reason);
    println!("Probability : {}%", decision.probability);
    println!("Confidence  : {}%", decision.confidence);
    println!("Factors:");
    for factor in &decision.factors {
        println!("  - {factor}");
    }

    if decision.signal != Signal::Hold {
        let setup = signal::entry_levels(
            decision.signal,
            snapshot.close,
            snapshot.atr,
            snapshot.trend_strength,
        );
        println!("Entry       : {:.4}", setup.entry);
        println!("Stop Loss   : {:.4}", setup.stop_loss);
        println!("Take Profit : {:.4}", setup.take_profit);
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: Option<&PathBuf>, data_override: Option<&PathBuf>) -> ExitCode {
    let adapter = match config_path {
        Some(path) => match load_config(path) {
            Ok(a) => Some(a),
            Err(code) => return code,
        },
        None => None,
    };

    let data_path = resolve_data_path(
        adapter.as_ref().map(|a| a as &dyn ConfigPort),
        data_override,
    );
    let data_port = CsvAdapter::new(data_path);
    match data_port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let result = build_backtest_config(&adapter, None, None)
        .and_then(|config| validate_backtest_config(&config));
    match result {
        Ok(()) => {
            println!("Configuration OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
