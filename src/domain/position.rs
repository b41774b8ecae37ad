//! Flat/long position state machine driven by price-vs-SMA streaks.
//!
//! Each step runs classify → transition in that order. Accrual is left to
//! the caller, which reads the state after `step` returns.

/// Default number of consecutive classified periods needed to flip.
pub const DEFAULT_CONFIRM_PERIODS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

impl PositionState {
    pub fn is_long(self) -> bool {
        matches!(self, PositionState::Long)
    }
}

/// How a single close compares with its SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Above,
    NotAbove,
}

impl Signal {
    /// Strictly above a present SMA counts as `Above`; equal or missing does not.
    pub fn classify(close: f64, sma: Option<f64>) -> Self {
        match sma {
            Some(avg) if close > avg => Signal::Above,
            _ => Signal::NotAbove,
        }
    }
}

/// What happened to the position on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Entered,
    Exited,
}

#[derive(Debug, Clone)]
pub struct PositionMachine {
    state: PositionState,
    above: usize,
    below: usize,
    confirm: usize,
}

impl PositionMachine {
    pub fn new(confirm: usize) -> Self {
        Self {
            state: PositionState::Flat,
            above: 0,
            below: 0,
            confirm,
        }
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn streaks(&self) -> (usize, usize) {
        (self.above, self.below)
    }

    pub fn step(&mut self, signal: Signal) -> Transition {
        match signal {
            Signal::Above => {
                self.above += 1;
                self.below = 0;
            }
            Signal::NotAbove => {
                self.below += 1;
                self.above = 0;
            }
        }

        match self.state {
            PositionState::Flat if self.above >= self.confirm => {
                self.state = PositionState::Long;
                Transition::Entered
            }
            PositionState::Long if self.below >= self.confirm => {
                self.state = PositionState::Flat;
                Transition::Exited
            }
            _ => Transition::None,
        }
    }
}

impl Default for PositionMachine {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_PERIODS)
    }
}
