//! smacross: OHLC bucketing, moving averages and an SMA streak backtest over
//! raw price samples.
//!
//! Hexagonal architecture: pure computations in [`domain`], port traits in
//! [`ports`], file-backed implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
