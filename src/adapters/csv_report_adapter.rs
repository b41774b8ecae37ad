//! CSV report adapter: one row per candle with its SMA, position and equity.
//!
//! Also writes bare candle and lump-sum valuation tables for the `candles`
//! and `portfolio` commands.

use crate::domain::candle::Candle;
use crate::domain::error::SmacrossError;
use crate::domain::pipeline::PipelineResult;
use crate::domain::portfolio::LumpSumValuation;
use crate::domain::position::PositionState;
use crate::domain::time::timestamp_to_datetime;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReportRow {
    bucket_start_ms: i64,
    time_utc: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    sma: Option<f64>,
    position: &'static str,
    equity: f64,
}

#[derive(Debug, Serialize)]
struct CandleRow {
    bucket_start_ms: i64,
    time_utc: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Serialize)]
struct ValueRow {
    day_start_ms: i64,
    date: String,
    value: f64,
}

fn format_utc(timestamp_ms: i64) -> String {
    timestamp_to_datetime(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

fn write_err(e: csv::Error) -> SmacrossError {
    SmacrossError::Data {
        reason: format!("failed to write report: {}", e),
    }
}

fn position_label(state: Option<&PositionState>) -> &'static str {
    match state {
        Some(PositionState::Long) => "long",
        _ => "flat",
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    /// Write the report rows to any writer.
    pub fn write_to<W: Write>(result: &PipelineResult, writer: W) -> Result<(), SmacrossError> {
        let mut wtr = csv::Writer::from_writer(writer);

        for (i, candle) in result.candles.iter().enumerate() {
            wtr.serialize(ReportRow {
                bucket_start_ms: candle.bucket_start_ms,
                time_utc: format_utc(candle.bucket_start_ms),
                open: candle.open,
                high: candle.high,
                low: candle.low,
                close: candle.close,
                sma: result.sma.get(i),
                position: position_label(result.backtest.states.get(i)),
                equity: result.backtest.equity_curve.get(i).copied().unwrap_or_default(),
            })
            .map_err(write_err)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_candles_to<W: Write>(candles: &[Candle], writer: W) -> Result<(), SmacrossError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for c in candles {
            wtr.serialize(CandleRow {
                bucket_start_ms: c.bucket_start_ms,
                time_utc: format_utc(c.bucket_start_ms),
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
            })
            .map_err(write_err)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_valuation_to<W: Write>(
        valuation: &LumpSumValuation,
        writer: W,
    ) -> Result<(), SmacrossError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for p in &valuation.values {
            let date = timestamp_to_datetime(p.day_start_ms)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            wtr.serialize(ValueRow {
                day_start_ms: p.day_start_ms,
                date,
                value: p.value,
            })
            .map_err(write_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &PipelineResult, output_path: &str) -> Result<(), SmacrossError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_to(result, file)
    }
}
