//! Lump-sum buy-and-hold valuation over daily closes.

use super::daily::DailyPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub day_start_ms: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LumpSumValuation {
    pub entry_price: f64,
    pub units: f64,
    pub values: Vec<ValuePoint>,
}

impl LumpSumValuation {
    pub fn final_value(&self) -> Option<f64> {
        self.values.last().map(|p| p.value)
    }
}

/// Buy `amount` worth of the asset at the first daily close and mark the
/// holding to every later close. `None` for empty input or a zero entry price.
pub fn value_lump_sum(daily: &[DailyPoint], amount: f64) -> Option<LumpSumValuation> {
    let first = daily.first()?;
    if first.close == 0.0 {
        return None;
    }

    let units = amount / first.close;
    let values = daily
        .iter()
        .map(|d| ValuePoint {
            day_start_ms: d.day_start_ms,
            value: units * d.close,
        })
        .collect();

    Some(LumpSumValuation {
        entry_price: first.close,
        units,
        values,
    })
}
