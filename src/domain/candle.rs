//! Fixed-width OHLC bucketing.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;
use crate::domain::sample::Sample;
use crate::domain::time::{day_bounds_ms, floor_to};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub bucket_start_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    fn seed(bucket_start_ms: i64, price: f64) -> Self {
        Self {
            bucket_start_ms,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    /// Whether `timestamp_ms` falls inside `[bucket_start, bucket_start + width)`.
    pub fn contains(&self, timestamp_ms: i64, width_ms: i64) -> bool {
        timestamp_ms >= self.bucket_start_ms
            && self
                .bucket_start_ms
                .checked_add(width_ms)
                .is_none_or(|end| timestamp_ms < end)
    }
}

/// Group samples into `width_ms` buckets and reduce each bucket to OHLC.
///
/// Open is the first sample seen for a bucket and close the last, in input
/// order. Output is ascending by bucket start.
pub fn aggregate(samples: &[Sample], width_ms: i64) -> Result<Vec<Candle>, SmacrossError> {
    if width_ms <= 0 {
        return Err(SmacrossError::InvalidBucketWidth { width_ms });
    }

    let mut buckets: BTreeMap<i64, Candle> = BTreeMap::new();
    for sample in samples {
        let start = floor_to(sample.timestamp_ms, width_ms).ok_or(
            SmacrossError::TimestampOutOfRange {
                timestamp_ms: sample.timestamp_ms,
            },
        )?;
        buckets
            .entry(start)
            .and_modify(|c| c.update(sample.price))
            .or_insert_with(|| Candle::seed(start, sample.price));
    }

    Ok(buckets.into_values().collect())
}

/// Closing prices of `candles`, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Samples that fall on the given UTC calendar day.
pub fn filter_day(samples: &[Sample], date: NaiveDate) -> Vec<Sample> {
    let (start, end) = day_bounds_ms(date);
    samples
        .iter()
        .filter(|s| s.timestamp_ms >= start && s.timestamp_ms < end)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::{MS_PER_DAY, minutes_to_ms};

    fn samples(points: &[(i64, f64)]) -> Vec<Sample> {
        points.iter().copied().map(Sample::from).collect()
    }

    #[test]
    fn two_buckets_one_minute() {
        let s = samples(&[(0, 100.0), (30_000, 110.0), (70_000, 90.0)]);
        let candles = aggregate(&s, 60_000).unwrap();

        assert_eq!(
            candles,
            vec![
                Candle {
                    bucket_start_ms: 0,
                    open: 100.0,
                    high: 110.0,
                    low: 100.0,
                    close: 110.0,
                },
                Candle {
                    bucket_start_ms: 60_000,
                    open: 90.0,
                    high: 90.0,
                    low: 90.0,
                    close: 90.0,
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_candles() {
        assert!(aggregate(&[], 60_000).unwrap().is_empty());
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = aggregate(&samples(&[(0, 1.0)]), 0).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidBucketWidth { width_ms: 0 }));
    }

    #[test]
    fn negative_width_is_rejected() {
        assert!(aggregate(&[], -5).is_err());
    }

    #[test]
    fn high_low_track_extremes() {
        let s = samples(&[(0, 50.0), (1, 70.0), (2, 30.0), (3, 55.0)]);
        let candles = aggregate(&s, 60_000).unwrap();
        assert_eq!(candles.len(), 1);
        let c = candles[0];
        assert_eq!(c.open, 50.0);
        assert_eq!(c.high, 70.0);
        assert_eq!(c.low, 30.0);
        assert_eq!(c.close, 55.0);
    }

    #[test]
    fn close_follows_input_order() {
        // Later timestamp first: "last" is the last processed, not the latest.
        let s = samples(&[(50_000, 10.0), (10_000, 20.0)]);
        let candles = aggregate(&s, 60_000).unwrap();
        assert_eq!(candles[0].open, 10.0);
        assert_eq!(candles[0].close, 20.0);
    }

    #[test]
    fn unsorted_buckets_emitted_ascending() {
        let s = samples(&[(180_000, 3.0), (0, 1.0), (60_000, 2.0)]);
        let starts: Vec<i64> = aggregate(&s, 60_000)
            .unwrap()
            .iter()
            .map(|c| c.bucket_start_ms)
            .collect();
        assert_eq!(starts, vec![0, 60_000, 180_000]);
    }

    #[test]
    fn bucket_boundary_is_half_open() {
        let s = samples(&[(59_999, 1.0), (60_000, 2.0)]);
        let candles = aggregate(&s, 60_000).unwrap();
        assert_eq!(candles.len(), 2);
        assert!(candles[0].contains(59_999, 60_000));
        assert!(!candles[0].contains(60_000, 60_000));
        assert!(candles[1].contains(60_000, 60_000));
    }

    #[test]
    fn gaps_are_not_filled() {
        let s = samples(&[(0, 1.0), (minutes_to_ms(10).unwrap(), 2.0)]);
        assert_eq!(aggregate(&s, minutes_to_ms(1).unwrap()).unwrap().len(), 2);
    }

    #[test]
    fn timestamp_below_first_bucket_is_rejected() {
        let err = aggregate(&samples(&[(0, 1.0), (i64::MIN, 2.0)]), 60_000).unwrap_err();
        assert!(matches!(
            err,
            SmacrossError::TimestampOutOfRange {
                timestamp_ms: i64::MIN
            }
        ));
    }

    #[test]
    fn last_bucket_before_i64_max() {
        let candles = aggregate(&samples(&[(i64::MAX, 1.0)]), 60_000).unwrap();
        assert_eq!(candles.len(), 1);
        assert!(candles[0].contains(i64::MAX, 60_000));
        assert!(!candles[0].contains(candles[0].bucket_start_ms - 1, 60_000));
    }

    #[test]
    fn closes_in_order() {
        let s = samples(&[(0, 1.0), (60_000, 2.0), (120_000, 3.0)]);
        let candles = aggregate(&s, 60_000).unwrap();
        assert_eq!(closes(&candles), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn filter_day_keeps_only_that_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, _) = day_bounds_ms(date);
        let s = samples(&[
            (start - 1, 1.0),
            (start, 2.0),
            (start + MS_PER_DAY - 1, 3.0),
            (start + MS_PER_DAY, 4.0),
        ]);
        let day = filter_day(&s, date);
        let prices: Vec<f64> = day.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![2.0, 3.0]);
    }
}
