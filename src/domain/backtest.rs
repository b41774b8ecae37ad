//! Equity curve replay for the SMA streak rule.
//!
//! Long-only, no costs or slippage. While long, equity compounds by each
//! period's close-to-close return; while flat it is carried forward.

use tracing::debug;

use crate::domain::error::SmacrossError;
use crate::domain::indicator::SmaSeries;
use crate::domain::position::{
    DEFAULT_CONFIRM_PERIODS, PositionMachine, PositionState, Signal, Transition,
};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub confirm_periods: usize,
}

impl BacktestConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            confirm_periods: DEFAULT_CONFIRM_PERIODS,
        }
    }
}

/// One long holding, by candle index.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSpan {
    pub entry_index: usize,
    /// `None` while still open at the end of the series.
    pub exit_index: Option<usize>,
    pub entry_equity: f64,
    pub exit_equity: f64,
}

impl TradeSpan {
    pub fn return_pct(&self) -> f64 {
        if self.entry_equity != 0.0 {
            self.exit_equity / self.entry_equity - 1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub equity_curve: Vec<f64>,
    /// Position state after each step; index 0 is always flat.
    pub states: Vec<PositionState>,
    pub trades: Vec<TradeSpan>,
}

impl BacktestResult {
    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().copied()
    }
}

/// Equity curve with the default three-period confirmation.
pub fn backtest(
    closes: &[f64],
    sma: &SmaSeries,
    starting_capital: f64,
) -> Result<Vec<f64>, SmacrossError> {
    run_backtest(closes, sma, &BacktestConfig::new(starting_capital)).map(|r| r.equity_curve)
}

pub fn run_backtest(
    closes: &[f64],
    sma: &SmaSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, SmacrossError> {
    if closes.len() != sma.len() {
        return Err(SmacrossError::LengthMismatch {
            closes: closes.len(),
            sma: sma.len(),
        });
    }

    let mut result = BacktestResult {
        equity_curve: Vec::with_capacity(closes.len()),
        states: Vec::with_capacity(closes.len()),
        trades: Vec::new(),
    };
    if closes.is_empty() {
        return Ok(result);
    }

    let mut machine = PositionMachine::new(config.confirm_periods);
    let mut equity = config.initial_capital;
    let mut open: Option<TradeSpan> = None;
    result.equity_curve.push(equity);
    result.states.push(machine.state());

    for i in 1..closes.len() {
        let transition = machine.step(Signal::classify(closes[i], sma.get(i)));

        match transition {
            Transition::Entered => {
                debug!(index = i, close = closes[i], "entered long");
                open = Some(TradeSpan {
                    entry_index: i,
                    exit_index: None,
                    entry_equity: equity,
                    exit_equity: equity,
                });
            }
            Transition::Exited => {
                debug!(index = i, close = closes[i], "exited to flat");
                if let Some(mut trade) = open.take() {
                    trade.exit_index = Some(i);
                    trade.exit_equity = equity;
                    result.trades.push(trade);
                }
            }
            Transition::None => {}
        }

        // Entry on this step already earns this step's return.
        if machine.state().is_long() {
            let daily_return = closes[i] / closes[i - 1] - 1.0;
            equity *= 1.0 + daily_return;
        }

        result.equity_curve.push(equity);
        result.states.push(machine.state());
    }

    if let Some(mut trade) = open {
        trade.exit_equity = equity;
        result.trades.push(trade);
    }

    while result.equity_curve.len() < closes.len() {
        let last = result.equity_curve[result.equity_curve.len() - 1];
        result.equity_curve.push(last);
    }

    Ok(result)
}
