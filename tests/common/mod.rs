#![allow(dead_code)]

use chrono::NaiveDate;
use smacross::domain::error::SmacrossError;
use smacross::domain::pipeline::PipelineResult;
pub use smacross::domain::sample::Sample;
use smacross::domain::time::{MS_PER_DAY, MS_PER_MINUTE, day_bounds_ms, utc_date};
use smacross::ports::data_port::SamplePort;
use smacross::ports::report_port::ReportPort;
use std::cell::RefCell;

pub struct MockSamplePort {
    pub samples: Vec<Sample>,
    pub error: Option<String>,
}

impl MockSamplePort {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            samples: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl SamplePort for MockSamplePort {
    fn fetch_samples(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Sample>, SmacrossError> {
        if let Some(reason) = &self.error {
            return Err(SmacrossError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .samples
            .iter()
            .filter(|s| {
                let date = utc_date(s.timestamp_ms).unwrap();
                start_date.is_none_or(|d| date >= d) && end_date.is_none_or(|d| date <= d)
            })
            .copied()
            .collect())
    }
}

/// Records what it was asked to write instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub writes: RefCell<Vec<(String, usize)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(&self, result: &PipelineResult, output_path: &str) -> Result<(), SmacrossError> {
        self.writes
            .borrow_mut()
            .push((output_path.to_string(), result.candles.len()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn samples(points: &[(i64, f64)]) -> Vec<Sample> {
    points.iter().copied().map(Sample::from).collect()
}

/// One sample per day at 12:00 UTC starting on `start`.
pub fn daily_samples(start: NaiveDate, prices: &[f64]) -> Vec<Sample> {
    let (base, _) = day_bounds_ms(start);
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| Sample::new(base + i as i64 * MS_PER_DAY + 12 * 60 * MS_PER_MINUTE, p))
        .collect()
}

/// `per_day` evenly spaced samples for each day, all at that day's price.
pub fn intraday_samples(start: NaiveDate, prices: &[f64], per_day: i64) -> Vec<Sample> {
    let (base, _) = day_bounds_ms(start);
    let step = MS_PER_DAY / per_day;
    let mut out = Vec::new();
    for (day, &p) in prices.iter().enumerate() {
        for k in 0..per_day {
            out.push(Sample::new(base + day as i64 * MS_PER_DAY + k * step, p));
        }
    }
    out
}

/// A rise, a long plateau above trend, then a collapse.
pub fn trend_then_crash(days: usize) -> Vec<f64> {
    let rise = days / 2;
    (0..days)
        .map(|i| {
            if i < rise {
                100.0 + i as f64
            } else {
                (100.0 + rise as f64) - 3.0 * (i - rise) as f64
            }
        })
        .collect()
}
