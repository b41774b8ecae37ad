//! Configuration validation.
//!
//! Checks config fields before any samples are loaded.

use crate::domain::error::SmacrossError;
use crate::domain::time::minutes_to_ms;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_samples_path(config)?;
    validate_dates(config)?;
    validate_strategy_config(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_candle_minutes(config)?;
    validate_positive_int(config, "sma_window")?;
    validate_positive_int(config, "confirm_periods")?;
    validate_initial_capital(config)?;
    Ok(())
}

fn validate_samples_path(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("data", "samples") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "samples".to_string(),
        }),
    }
}

pub fn validate_dates(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let start = config.get_date("data", "start_date")?;
    let end = config.get_date("data", "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(SmacrossError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_candle_minutes(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match validate_positive_int(config, "candle_minutes")? {
        Some(minutes) if minutes_to_ms(minutes).is_none() => Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "candle_minutes".to_string(),
            reason: format!("{minutes} minutes does not fit in a millisecond timestamp"),
        }),
        _ => Ok(()),
    }
}

fn validate_positive_int(config: &dyn ConfigPort, key: &str) -> Result<Option<i64>, SmacrossError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(None);
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => Ok(Some(v)),
        _ => Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be a positive integer"),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let Some(raw) = config.get_string("strategy", "initial_capital") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(()),
        _ => Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be a number".to_string(),
        }),
    }
}
