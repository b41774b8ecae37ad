//! Core domain types and computations.

pub mod backtest;
pub mod candle;
pub mod config_validation;
pub mod daily;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod pipeline;
pub mod portfolio;
pub mod position;
pub mod sample;
pub mod time;
