//! Technical indicators computed over plain numeric sequences.
//!
//! - `RollingWindow`: fixed-capacity FIFO with a running sum
//! - `SmaSeries`: index-aligned moving average values, `None` during warmup

pub mod rolling;
pub mod sma;

pub use rolling::RollingWindow;
pub use sma::{SmaSeries, calculate_sma};
