//! Sliding window with an O(1) running sum.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity + 1),
            sum: 0.0,
        }
    }

    /// Push `value`, evicting and returning the oldest value once the window
    /// is over capacity.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.capacity {
            let evicted = self.values.pop_front();
            if let Some(old) = evicted {
                self.sum -= old;
            }
            evicted
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean over the full window, `None` until `capacity` values were pushed.
    pub fn mean(&self) -> Option<f64> {
        if self.capacity > 0 && self.is_full() {
            Some(self.sum / self.capacity as f64)
        } else {
            None
        }
    }
}
