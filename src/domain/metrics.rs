//! Performance metrics over a backtested equity curve.

use super::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub buy_and_hold_return: f64,
    pub max_drawdown: f64,
    /// Longest run of periods spent below a prior equity peak.
    pub max_drawdown_duration: usize,
    /// Fraction of stepped periods spent long.
    pub exposure: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub win_rate: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult, closes: &[f64]) -> Self {
        let equity_curve = &result.equity_curve;

        let total_return = match (equity_curve.first(), equity_curve.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => (last - first) / first,
            _ => 0.0,
        };

        let buy_and_hold_return = match (closes.first(), closes.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => (last - first) / first,
            _ => 0.0,
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(equity_curve);

        let steps = result.states.len().saturating_sub(1);
        let exposure = if steps > 0 {
            result.states.iter().skip(1).filter(|s| s.is_long()).count() as f64 / steps as f64
        } else {
            0.0
        };

        let total_trades = result.trades.len();
        let trades_won = result
            .trades
            .iter()
            .filter(|t| t.return_pct() > 0.0)
            .count();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            buy_and_hold_return,
            max_drawdown,
            max_drawdown_duration,
            exposure,
            total_trades,
            trades_won,
            win_rate,
        }
    }
}

fn compute_drawdown(equity_curve: &[f64]) -> (f64, usize) {
    let Some(&first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for &equity in equity_curve {
        if equity >= peak {
            peak = equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}
