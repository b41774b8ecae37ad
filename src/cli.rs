//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvSampleAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::candle::{self, Candle};
use crate::domain::config_validation::{validate_config, validate_dates, validate_strategy_config};
use crate::domain::daily::to_daily_close;
use crate::domain::error::SmacrossError;
use crate::domain::metrics::Metrics;
use crate::domain::pipeline::{
    DEFAULT_CANDLE_MINUTES, DEFAULT_INITIAL_CAPITAL, DEFAULT_SMA_WINDOW, PipelineConfig,
    PipelineResult, SmaSource, run_pipeline,
};
use crate::domain::portfolio::value_lump_sum;
use crate::domain::position::DEFAULT_CONFIRM_PERIODS;
use crate::domain::time::minutes_to_ms;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SamplePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "SMA streak strategy backtester for price samples")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the SMA streak backtest described by a config file
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [data] samples
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Override [report] output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Aggregate samples into OHLC candles
    Candles {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_CANDLE_MINUTES)]
        minutes: i64,
        /// Only bucket samples from this UTC day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Value a lump-sum purchase at every daily close
    Portfolio {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long, default_value_t = 1000.0)]
        amount: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a config file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            input,
            output,
        } => run_backtest(&config, input.as_ref(), output.as_ref()),
        Command::Candles {
            input,
            minutes,
            day,
            output,
        } => run_candles(&input, minutes, day, output.as_ref()),
        Command::Portfolio {
            input,
            start_date,
            amount,
            output,
        } => run_portfolio(&input, start_date, amount, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, SmacrossError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_pipeline_config(adapter: &dyn ConfigPort) -> Result<PipelineConfig, SmacrossError> {
    let candle_minutes = adapter.get_int("strategy", "candle_minutes", DEFAULT_CANDLE_MINUTES);
    let sma_window = adapter.get_int("strategy", "sma_window", DEFAULT_SMA_WINDOW as i64);
    let confirm = adapter.get_int("strategy", "confirm_periods", DEFAULT_CONFIRM_PERIODS as i64);

    let positive = |key: &str, value: i64| -> Result<usize, SmacrossError> {
        usize::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| SmacrossError::ConfigInvalid {
                section: "strategy".into(),
                key: key.into(),
                reason: format!("{key} must be a positive integer"),
            })
    };
    positive("candle_minutes", candle_minutes)?;
    if minutes_to_ms(candle_minutes).is_none() {
        return Err(SmacrossError::ConfigInvalid {
            section: "strategy".into(),
            key: "candle_minutes".into(),
            reason: format!("{candle_minutes} minutes does not fit in a millisecond timestamp"),
        });
    }

    let sma_source = if adapter.get_bool("strategy", "sma_daily", true) {
        SmaSource::Daily
    } else {
        SmaSource::Candles
    };

    Ok(PipelineConfig {
        candle_minutes,
        sma_window: positive("sma_window", sma_window)?,
        sma_source,
        confirm_periods: positive("confirm_periods", confirm)?,
        initial_capital: adapter.get_double("strategy", "initial_capital", DEFAULT_INITIAL_CAPITAL),
    })
}

fn run_backtest(
    config_path: &PathBuf,
    input_override: Option<&PathBuf>,
    output_override: Option<&PathBuf>,
) -> Result<(), SmacrossError> {
    let adapter = load_config(config_path)?;

    let samples_path = match input_override {
        Some(p) => {
            validate_dates(&adapter)?;
            validate_strategy_config(&adapter)?;
            p.clone()
        }
        None => {
            validate_config(&adapter)?;
            PathBuf::from(adapter.get_string("data", "samples").unwrap_or_default())
        }
    };
    let pipeline_config = build_pipeline_config(&adapter)?;
    let start_date = adapter.get_date("data", "start_date")?;
    let end_date = adapter.get_date("data", "end_date")?;

    let data_port = CsvSampleAdapter::new(samples_path);
    let output = output_override
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("strategy.csv"));

    run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter,
        &pipeline_config,
        start_date,
        end_date,
        &output,
    )
    .map(|_| ())
}

/// Fetch, run, summarise and report. Returns the pipeline result so callers
/// can inspect it.
pub fn run_backtest_pipeline(
    data_port: &dyn SamplePort,
    report_port: &dyn ReportPort,
    config: &PipelineConfig,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    output_path: &PathBuf,
) -> Result<PipelineResult, SmacrossError> {
    let samples = data_port.fetch_samples(start_date, end_date)?;
    if samples.is_empty() {
        return Err(SmacrossError::NoData);
    }
    info!(samples = samples.len(), "loaded samples");

    let result = run_pipeline(&samples, config)?;
    if result.sma.values.iter().all(Option::is_none) {
        warn!(
            window = config.sma_window,
            "not enough history for a single SMA value; strategy never enters"
        );
    }

    let closes = result.closes();
    let metrics = Metrics::compute(&result.backtest, &closes);
    print_summary(config, &result, &metrics);

    let output = output_path.display().to_string();
    report_port.write(&result, &output)?;
    eprintln!("\nReport written to: {}", output);

    Ok(result)
}

fn print_summary(config: &PipelineConfig, result: &PipelineResult, metrics: &Metrics) {
    let source = match config.sma_source {
        SmaSource::Daily => "daily closes",
        SmaSource::Candles => "candle closes",
    };
    eprintln!("\n=== Strategy Results ===");
    eprintln!("Candles:          {} x {} min", result.candles.len(), config.candle_minutes);
    eprintln!("SMA:              {} over {}", config.sma_window, source);
    eprintln!("Confirmation:     {} periods", config.confirm_periods);
    eprintln!("Initial Capital:  {:.2}", config.initial_capital);
    eprintln!(
        "Final Equity:     {:.2}",
        result.backtest.final_equity().unwrap_or(config.initial_capital)
    );
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Buy & Hold:       {:.2}%", metrics.buy_and_hold_return * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Exposure:         {:.1}%", metrics.exposure * 100.0);
    eprintln!("Total Trades:     {}", metrics.total_trades);
    eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
}

fn run_candles(
    input: &PathBuf,
    minutes: i64,
    day: Option<NaiveDate>,
    output: Option<&PathBuf>,
) -> Result<(), SmacrossError> {
    let samples = CsvSampleAdapter::new(input.clone()).fetch_samples(None, None)?;
    let samples = match day {
        Some(d) => candle::filter_day(&samples, d),
        None => samples,
    };
    if samples.is_empty() {
        return Err(SmacrossError::NoData);
    }

    let width_ms = minutes_to_ms(minutes).ok_or(SmacrossError::CandleWidthOverflow { minutes })?;
    let candles = candle::aggregate(&samples, width_ms)?;
    info!(candles = candles.len(), minutes, "aggregated candles");
    write_candles(&candles, output)
}

fn write_candles(candles: &[Candle], output: Option<&PathBuf>) -> Result<(), SmacrossError> {
    match output {
        Some(path) => {
            CsvReportAdapter::write_candles_to(candles, std::fs::File::create(path)?)?;
            eprintln!("Candles written to: {}", path.display());
            Ok(())
        }
        None => CsvReportAdapter::write_candles_to(candles, io::stdout().lock()),
    }
}

fn run_portfolio(
    input: &PathBuf,
    start_date: NaiveDate,
    amount: f64,
    output: Option<&PathBuf>,
) -> Result<(), SmacrossError> {
    let samples = CsvSampleAdapter::new(input.clone()).fetch_samples(Some(start_date), None)?;
    let daily = to_daily_close(&samples)?;
    let valuation = value_lump_sum(&daily, amount).ok_or(SmacrossError::NoData)?;

    eprintln!(
        "Entry price: {:.2}, units bought: {:.6}",
        valuation.entry_price, valuation.units
    );
    if let Some(last) = valuation.final_value() {
        eprintln!("Current value: {:.2}", last);
    }

    match output {
        Some(path) => {
            CsvReportAdapter::write_valuation_to(&valuation, std::fs::File::create(path)?)?;
            eprintln!("Valuation written to: {}", path.display());
            Ok(())
        }
        None => CsvReportAdapter::write_valuation_to(&valuation, io::stdout().lock()),
    }
}

fn run_validate(config_path: &PathBuf) -> Result<(), SmacrossError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    let config = build_pipeline_config(&adapter)?;

    eprintln!("  candle_minutes:  {}", config.candle_minutes);
    eprintln!("  sma_window:      {}", config.sma_window);
    eprintln!("  sma_daily:       {}", config.sma_source == SmaSource::Daily);
    eprintln!("  confirm_periods: {}", config.confirm_periods);
    eprintln!("  initial_capital: {}", config.initial_capital);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
