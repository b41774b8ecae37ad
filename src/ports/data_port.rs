//! Price sample source port.

use crate::domain::error::SmacrossError;
use crate::domain::sample::Sample;
use chrono::NaiveDate;

pub trait SamplePort {
    /// Samples whose UTC date lies in `[start_date, end_date]`, sorted by
    /// timestamp. `None` leaves that side of the range open.
    fn fetch_samples(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Sample>, SmacrossError>;
}
