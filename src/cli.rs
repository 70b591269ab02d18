//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, FillPolicy};
use crate::domain::config_validation::{validate_backtest_config, validate_indicator_config};
use crate::domain::error::OracleError;
use crate::domain::features::{compute_indicator_rows, PriceColumn};
use crate::domain::indicator::IndicatorConfig;
use crate::domain::merge::merge_features;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::validate_series;
use crate::domain::sentiment::aggregate_daily;
use crate::domain::strategy::MomentumPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{PriceDataPort, SentimentDataPort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "market-oracle", about = "Price and sentiment feature pipeline with backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the merged feature matrix for each instrument
    Features {
        /// Directory holding {instrument}_prices.csv and {instrument}_sentiment.csv
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Single instrument override (otherwise read from config)
        #[arg(long)]
        instrument: Option<String>,
        /// Directory for {instrument}_features.csv output
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the momentum strategy over each instrument's price series
    Backtest {
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        instrument: Option<String>,
        /// Directory for fills/equity CSV output (console summary only if unset)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Show data range for each instrument
    Info {
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        instrument: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Features {
            data_dir,
            config,
            instrument,
            output_dir,
        } => run_features(&data_dir, config.as_ref(), instrument.as_deref(), output_dir.as_ref()),
        Command::Backtest {
            data_dir,
            config,
            instrument,
            output_dir,
        } => run_backtest(&data_dir, config.as_ref(), instrument.as_deref(), output_dir.as_ref()),
        Command::Info {
            data_dir,
            config,
            instrument,
        } => run_info(&data_dir, config.as_ref(), instrument.as_deref()),
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        // No config file means every option takes its default.
        return FileConfigAdapter::from_string("").map_err(|reason| {
            eprintln!("error: {reason}");
            ExitCode::from(2)
        });
    };

    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = OracleError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_indicator_config(adapter: &dyn ConfigPort) -> IndicatorConfig {
    IndicatorConfig {
        rsi_period: adapter.get_int("indicators", "rsi_period", 14) as usize,
        macd_fast: adapter.get_int("indicators", "macd_fast", 12) as usize,
        macd_slow: adapter.get_int("indicators", "macd_slow", 26) as usize,
        macd_signal: adapter.get_int("indicators", "macd_signal", 9) as usize,
        bb_period: adapter.get_int("indicators", "bb_period", 20) as usize,
        bb_k: adapter.get_double("indicators", "bb_k", 2.0),
        vol_window: adapter.get_int("indicators", "vol_window", 21) as usize,
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    let fill_policy = match adapter
        .get_string("backtest", "fill_policy")
        .as_deref()
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("at_close") => FillPolicy::AtClose,
        _ => FillPolicy::NextOpen,
    };

    BacktestConfig {
        initial_cash: adapter.get_double("backtest", "initial_cash", 10_000.0),
        commission_rate: adapter.get_double("backtest", "commission_rate", 0.001),
        confidence_threshold: adapter.get_double("backtest", "confidence_threshold", 0.75),
        allocation_notional: adapter.get_double("backtest", "allocation_notional", 10_000.0),
        fill_policy,
    }
}

pub fn resolve_price_column(adapter: &dyn ConfigPort) -> PriceColumn {
    adapter
        .get_string("indicators", "price_column")
        .and_then(|name| PriceColumn::parse(&name))
        .unwrap_or_default()
}

pub fn resolve_instruments(
    instrument_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Vec<String> {
    if let Some(i) = instrument_override {
        return vec![i.to_uppercase()];
    }

    if let Some(list) = config.get_string("data", "instruments") {
        return list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(instrument) = config.get_string("data", "instrument") {
        let instrument = instrument.trim().to_uppercase();
        if !instrument.is_empty() {
            return vec![instrument];
        }
    }

    vec![]
}

fn run_features(
    data_dir: &PathBuf,
    config_path: Option<&PathBuf>,
    instrument_override: Option<&str>,
    output_dir: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_indicator_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve instruments
    let instruments = resolve_instruments(instrument_override, &adapter);
    if instruments.is_empty() {
        eprintln!("error: no instruments configured (use --instrument or [data] instruments)");
        return ExitCode::from(2);
    }

    let indicator_config = build_indicator_config(&adapter);
    let column = resolve_price_column(&adapter);
    let data_port = CsvAdapter::new(data_dir.clone());
    let report = CsvReportAdapter::new();
    let output_dir = output_dir.cloned().unwrap_or_else(|| data_dir.clone());

    // Stage 3: Per-instrument pipeline; one bad instrument never aborts the run
    let mut failures = 0usize;
    for instrument in &instruments {
        eprintln!("Building features for {}", instrument);
        match build_feature_matrix(&data_port, instrument, column, &indicator_config) {
            Ok(rows) => {
                let path = output_dir.join(format!("{}_features.csv", instrument));
                match report.write_features(&rows, &path) {
                    Ok(()) => eprintln!("  {} rows written to {}", rows.len(), path.display()),
                    Err(e) => {
                        eprintln!("warning: skipping {} ({})", instrument, e);
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", instrument, e);
                failures += 1;
            }
        }
    }

    if failures == instruments.len() {
        eprintln!("error: no instrument produced a feature matrix");
        return ExitCode::from(3);
    }
    ExitCode::SUCCESS
}

fn build_feature_matrix(
    data_port: &CsvAdapter,
    instrument: &str,
    column: PriceColumn,
    config: &IndicatorConfig,
) -> Result<Vec<crate::domain::merge::FeatureRow>, OracleError> {
    let bars = data_port.fetch_prices(instrument)?;
    validate_series(&bars)?;

    let observations = data_port.fetch_observations(instrument)?;
    let sentiment = aggregate_daily(&observations);

    let rows = compute_indicator_rows(&bars, column, config);
    merge_features(&rows, &sentiment)
}

fn run_backtest(
    data_dir: &PathBuf,
    config_path: Option<&PathBuf>,
    instrument_override: Option<&str>,
    output_dir: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve instruments
    let instruments = resolve_instruments(instrument_override, &adapter);
    if instruments.is_empty() {
        eprintln!("error: no instruments configured (use --instrument or [data] instruments)");
        return ExitCode::from(2);
    }

    let bt_config = build_backtest_config(&adapter);
    let data_port = CsvAdapter::new(data_dir.clone());
    let report = CsvReportAdapter::new();

    // Stage 3: Per-instrument run
    let mut failures = 0usize;
    for instrument in &instruments {
        eprintln!("Running backtest for {}", instrument);

        let bars = match data_port.fetch_prices(instrument) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", instrument, e);
                failures += 1;
                continue;
            }
        };

        let mut policy = MomentumPolicy;
        let result = match backtest_engine::run_backtest(&bars, &mut policy, &bt_config) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", instrument, e);
                failures += 1;
                continue;
            }
        };

        // Stage 4: Console summary
        let metrics = Metrics::compute(&result);
        eprintln!("\n=== {} ===", instrument);
        eprintln!("Bars:             {}", bars.len());
        eprintln!("Final Equity:     ${:.2}", metrics.final_equity);
        eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
        eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
        eprintln!("Round Trips:      {}", metrics.round_trips);
        eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
        eprintln!("Total Commission: ${:.2}", metrics.total_commission);
        if let Some(order) = result.unresolved_order() {
            eprintln!("Unresolved order: submitted {}", order.submitted);
        }
        if result.portfolio.is_long() {
            eprintln!("Open position at end of series (marked at final close)");
        }

        // Stage 5: Optional CSV artifacts
        if let Some(dir) = output_dir {
            let fills_path = dir.join(format!("{}_fills.csv", instrument));
            let equity_path = dir.join(format!("{}_equity.csv", instrument));
            if let Err(e) = report
                .write_fills(&result, &fills_path)
                .and_then(|()| report.write_equity_curve(&result, &equity_path))
            {
                eprintln!("warning: failed to write artifacts for {} ({})", instrument, e);
            } else {
                eprintln!("Artifacts written to {}", dir.display());
            }
        }
    }

    if failures == instruments.len() {
        eprintln!("error: no instrument completed a backtest");
        return ExitCode::from(3);
    }
    ExitCode::SUCCESS
}

fn run_info(
    data_dir: &PathBuf,
    config_path: Option<&PathBuf>,
    instrument_override: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let instruments = resolve_instruments(instrument_override, &adapter);
    if instruments.is_empty() {
        eprintln!("error: no instruments configured (use --instrument or [data] instruments)");
        return ExitCode::from(2);
    }

    let data_port = CsvAdapter::new(data_dir.clone());
    for instrument in &instruments {
        match data_port.fetch_prices(instrument) {
            Ok(bars) if !bars.is_empty() => {
                let observations = data_port
                    .fetch_observations(instrument)
                    .map(|o| o.len())
                    .unwrap_or(0);
                println!(
                    "{}: {} bars, {} to {}, {} sentiment observations",
                    instrument,
                    bars.len(),
                    bars[0].date,
                    bars[bars.len() - 1].date,
                    observations,
                );
            }
            Ok(_) => eprintln!("{}: no data found", instrument),
            Err(e) => eprintln!("error querying {}: {}", instrument, e),
        }
    }
    ExitCode::SUCCESS
}
