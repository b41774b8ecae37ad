//! CSV price sample adapter.
//!
//! Expects a header row and `timestamp_ms,price` columns; extra columns are
//! ignored.

use crate::domain::error::SmacrossError;
use crate::domain::sample::Sample;
use crate::domain::time::utc_date;
use crate::ports::data_port::SamplePort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct SampleRecord {
    timestamp_ms: i64,
    price: f64,
}

pub struct CsvSampleAdapter {
    path: PathBuf,
}

impl CsvSampleAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<Vec<Sample>, SmacrossError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SmacrossError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut samples = Vec::new();
        for (line, result) in rdr.deserialize::<SampleRecord>().enumerate() {
            let record = result.map_err(|e| SmacrossError::Data {
                reason: format!("CSV parse error at record {}: {}", line + 1, e),
            })?;
            samples.push(Sample::new(record.timestamp_ms, record.price));
        }
        Ok(samples)
    }
}

impl SamplePort for CsvSampleAdapter {
    fn fetch_samples(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Sample>, SmacrossError> {
        let mut samples: Vec<Sample> = self
            .read_all()?
            .into_iter()
            .filter(|s| match utc_date(s.timestamp_ms) {
                Some(date) => {
                    start_date.is_none_or(|start| date >= start)
                        && end_date.is_none_or(|end| date <= end)
                }
                None => false,
            })
            .collect();

        // Stable sort keeps file order for equal timestamps.
        samples.sort_by_key(|s| s.timestamp_ms);
        Ok(samples)
    }
}
