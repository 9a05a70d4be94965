//! Configuration validation.
//!
//! Validates all config fields before a command touches any data.

use crate::domain::backtest::{DEFAULT_ENTRY_PREMIUM_PCT, DEFAULT_EXIT_MARKUP};
use crate::domain::error::OptdashError;
use crate::domain::indicator::rsi::DEFAULT_WINDOW;
use crate::domain::signal::{DEFAULT_ENTRY_THRESHOLD, DEFAULT_EXIT_THRESHOLD};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SYMBOL: &str = "SPY";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), OptdashError> {
    config.require_string("data", "dir")?;
    validate_symbol(config)?;
    validate_lookback(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), OptdashError> {
    validate_window(config)?;
    validate_threshold(config, "entry_threshold", DEFAULT_ENTRY_THRESHOLD)?;
    validate_threshold(config, "exit_threshold", DEFAULT_EXIT_THRESHOLD)?;
    validate_positive(config, "entry_premium_pct", DEFAULT_ENTRY_PREMIUM_PCT)?;
    validate_positive(config, "exit_markup", DEFAULT_EXIT_MARKUP)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> OptdashError {
    OptdashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), OptdashError> {
    match config.get_string("data", "symbol") {
        None => Ok(()),
        Some(s) if is_valid_symbol(s.trim()) => Ok(()),
        Some(_) => Err(invalid(
            "data",
            "symbol",
            "symbol must be a non-empty ticker",
        )),
    }
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '^')
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), OptdashError> {
    let value = config.get_int("data", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if value <= 0 {
        return Err(invalid(
            "data",
            "lookback_days",
            "lookback_days must be positive",
        ));
    }
    if value > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "data",
            "lookback_days",
            &format!("lookback_days must be at most {}", MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), OptdashError> {
    let value = config.get_int("backtest", "window", DEFAULT_WINDOW as i64);
    if value < 1 {
        return Err(invalid("backtest", "window", "window must be at least 1"));
    }
    Ok(())
}

fn validate_threshold(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), OptdashError> {
    let value = config.get_double("backtest", key, default);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "backtest",
            key,
            &format!("{} must be between 0 and 100", key),
        ));
    }
    Ok(())
}

fn validate_positive(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), OptdashError> {
    let value = config.get_double("backtest", key, default);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "backtest",
            key,
            &format!("{} must be positive", key),
        ));
    }
    Ok(())
}
