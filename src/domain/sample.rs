//! Raw price sample representation.

use crate::domain::error::SmacrossError;

/// One observed price at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp_ms, price): (i64, f64)) -> Self {
        Self::new(timestamp_ms, price)
    }
}

/// Check that samples are in non-decreasing timestamp order.
///
/// Bucketing and daily reduction take the last sample in input order as the
/// close, which is only the latest sample in time when this holds.
pub fn ensure_sorted(samples: &[Sample]) -> Result<(), SmacrossError> {
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp_ms < pair[0].timestamp_ms {
            return Err(SmacrossError::UnsortedSamples {
                index: i + 1,
                previous: pair[0].timestamp_ms,
                current: pair[1].timestamp_ms,
            });
        }
    }
    Ok(())
}
