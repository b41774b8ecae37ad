//! Daily closing prices keyed by UTC calendar day.

use std::collections::BTreeMap;

use crate::domain::error::SmacrossError;
use crate::domain::sample::Sample;
use crate::domain::time::utc_day_start_ms;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    /// UTC midnight of the day.
    pub day_start_ms: i64,
    pub close: f64,
}

/// Reduce samples to one closing price per UTC day.
///
/// The close is the price of the last sample processed for that day, so
/// input is expected sorted by timestamp. Output is ascending by day.
pub fn to_daily_close(samples: &[Sample]) -> Result<Vec<DailyPoint>, SmacrossError> {
    let mut days: BTreeMap<i64, f64> = BTreeMap::new();
    for sample in samples {
        let day = utc_day_start_ms(sample.timestamp_ms).ok_or(
            SmacrossError::TimestampOutOfRange {
                timestamp_ms: sample.timestamp_ms,
            },
        )?;
        days.insert(day, sample.price);
    }

    Ok(days
        .into_iter()
        .map(|(day_start_ms, close)| DailyPoint {
            day_start_ms,
            close,
        })
        .collect())
}

pub fn daily_closes(points: &[DailyPoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}
