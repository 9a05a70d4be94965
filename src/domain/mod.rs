//! Core domain types and logic.

pub mod ohlcv;
pub mod schedule;
pub mod indicator;
pub mod signal;
pub mod backtest;
pub mod trade;
pub mod metrics;
pub mod option_chain;
pub mod config_validation;
pub mod error;
