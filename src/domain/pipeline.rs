//! Samples → candles → SMA → equity curve.
//!
//! The SMA is computed either over candle closes or over daily closes. In the
//! daily case each candle reads the SMA of the last UTC day that has closed by
//! the end of the candle, so the backtest always sees index-aligned sequences
//! and never a daily close from after the candle.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest};
use crate::domain::candle::{self, Candle};
use crate::domain::daily::{self, DailyPoint};
use crate::domain::error::SmacrossError;
use crate::domain::indicator::{SmaSeries, calculate_sma};
use crate::domain::position::DEFAULT_CONFIRM_PERIODS;
use crate::domain::sample::{Sample, ensure_sorted};
use crate::domain::time::{MS_PER_DAY, minutes_to_ms, utc_day_start_ms};

pub const DEFAULT_CANDLE_MINUTES: i64 = 60;
pub const DEFAULT_SMA_WINDOW: usize = 200;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 404.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaSource {
    Candles,
    Daily,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub candle_minutes: i64,
    pub sma_window: usize,
    pub sma_source: SmaSource,
    pub confirm_periods: usize,
    pub initial_capital: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candle_minutes: DEFAULT_CANDLE_MINUTES,
            sma_window: DEFAULT_SMA_WINDOW,
            sma_source: SmaSource::Daily,
            confirm_periods: DEFAULT_CONFIRM_PERIODS,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub candles: Vec<Candle>,
    /// SMA value seen by each candle, aligned with `candles`.
    pub sma: SmaSeries,
    /// Daily closes and their SMA, only when the SMA source is daily.
    pub daily: Option<(Vec<DailyPoint>, SmaSeries)>,
    pub backtest: BacktestResult,
}

impl PipelineResult {
    pub fn closes(&self) -> Vec<f64> {
        candle::closes(&self.candles)
    }
}

/// Map each candle to the daily SMA value of the latest UTC day that ends at
/// or before the candle ends.
///
/// A candle closing at midnight reads the day it closes; every earlier
/// intraday candle reads the previous day. Days without a daily point map to
/// `None`.
pub fn align_daily_sma(
    candles: &[Candle],
    width_ms: i64,
    daily: &[DailyPoint],
    daily_sma: &SmaSeries,
) -> SmaSeries {
    let by_day: HashMap<i64, Option<f64>> = daily
        .iter()
        .zip(daily_sma.values.iter())
        .map(|(d, v)| (d.day_start_ms, *v))
        .collect();

    let values = candles
        .iter()
        .map(|c| {
            c.bucket_start_ms
                .checked_add(width_ms)
                .and_then(utc_day_start_ms)
                .and_then(|end_day| end_day.checked_sub(MS_PER_DAY))
                .and_then(|day| by_day.get(&day).copied().flatten())
        })
        .collect();

    SmaSeries::from_values(daily_sma.window, values)
}

pub fn run_pipeline(samples: &[Sample], config: &PipelineConfig) -> Result<PipelineResult, SmacrossError> {
    ensure_sorted(samples)?;

    let width_ms =
        minutes_to_ms(config.candle_minutes).ok_or(SmacrossError::CandleWidthOverflow {
            minutes: config.candle_minutes,
        })?;
    let candles = candle::aggregate(samples, width_ms)?;
    let closes = candle::closes(&candles);
    info!(
        samples = samples.len(),
        candles = candles.len(),
        minutes = config.candle_minutes,
        "aggregated candles"
    );

    let (sma, daily) = match config.sma_source {
        SmaSource::Candles => (calculate_sma(&closes, config.sma_window)?, None),
        SmaSource::Daily => {
            let points = daily::to_daily_close(samples)?;
            let daily_sma = calculate_sma(&daily::daily_closes(&points), config.sma_window)?;
            debug!(days = points.len(), "computed daily SMA");
            let aligned = align_daily_sma(&candles, width_ms, &points, &daily_sma);
            (aligned, Some((points, daily_sma)))
        }
    };

    let bt_config = BacktestConfig {
        initial_capital: config.initial_capital,
        confirm_periods: config.confirm_periods,
    };
    let backtest = run_backtest(&closes, &sma, &bt_config)?;
    info!(
        trades = backtest.trades.len(),
        final_equity = backtest.final_equity().unwrap_or(config.initial_capital),
        "backtest complete"
    );

    Ok(PipelineResult {
        candles,
        sma,
        daily,
        backtest,
    })
}
