//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(V[i-j] for j in 0..n) / n
//! Warmup: first (n-1) values are absent.

use crate::domain::error::SmacrossError;
use crate::domain::indicator::rolling::RollingWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct SmaSeries {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl SmaSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Build a series from precomputed values, e.g. after realignment.
    pub fn from_values(window: usize, values: Vec<Option<f64>>) -> Self {
        Self { window, values }
    }
}

pub fn calculate_sma(values: &[f64], window: usize) -> Result<SmaSeries, SmacrossError> {
    if window == 0 {
        return Err(SmacrossError::InvalidWindow { window });
    }

    let mut rolling = RollingWindow::new(window);
    let mut out = Vec::with_capacity(values.len());
    for &v in values {
        rolling.push(v);
        out.push(rolling.mean());
    }

    Ok(SmaSeries {
        window,
        values: out,
    })
}
