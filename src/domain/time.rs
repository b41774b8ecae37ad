//! Millisecond timestamp helpers shared by the bucketing and daily reducers.
//!
//! All calendar arithmetic is UTC. Timestamps are Unix epoch milliseconds.

use chrono::{DateTime, NaiveDate, Utc};

pub const MS_PER_MINUTE: i64 = 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * 60 * MS_PER_MINUTE;

/// Floor `timestamp_ms` to a multiple of `width_ms`, rounding toward negative
/// infinity for pre-epoch timestamps.
///
/// `None` when the floored value would fall below `i64::MIN`. `width_ms` must
/// be positive.
pub fn floor_to(timestamp_ms: i64, width_ms: i64) -> Option<i64> {
    timestamp_ms.div_euclid(width_ms).checked_mul(width_ms)
}

/// UTC midnight of the calendar day containing `timestamp_ms`.
pub fn utc_day_start_ms(timestamp_ms: i64) -> Option<i64> {
    floor_to(timestamp_ms, MS_PER_DAY)
}

/// UTC calendar date containing `timestamp_ms`.
pub fn utc_date(timestamp_ms: i64) -> Option<NaiveDate> {
    timestamp_to_datetime(timestamp_ms).map(|dt| dt.date_naive())
}

/// Half-open `[start, end)` millisecond bounds of a UTC calendar day.
pub fn day_bounds_ms(date: NaiveDate) -> (i64, i64) {
    let start = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default();
    (start, start + MS_PER_DAY)
}

pub fn timestamp_to_datetime(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
}

/// `None` if the width does not fit in an `i64` of milliseconds.
pub fn minutes_to_ms(minutes: i64) -> Option<i64> {
    minutes.checked_mul(MS_PER_MINUTE)
}
