//! Toy options backtest driven by the RSI-style oscillator.
//!
//! Pipeline per close: oscillator → entry/exit signals → synthetic option
//! prices → daily and cumulative P/L → trade records. Option prices are
//! fabricated as a fixed fraction of the underlying close, and each exit is
//! priced off the previous day's entry price. Both are reproduced as-is.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::OptdashError;
use crate::domain::indicator::rsi::{self, compute_oscillator};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{generate_signals, SignalThresholds};
use crate::domain::trade::TradeRecord;

pub const DEFAULT_ENTRY_PREMIUM_PCT: f64 = 0.02;
pub const DEFAULT_EXIT_MARKUP: f64 = 1.2;

/// How synthetic option prices are derived from the underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPricing {
    /// Entry price as a fraction of the underlying close.
    pub entry_premium_pct: f64,
    /// Exit price as a multiple of the previous day's entry price.
    pub exit_markup: f64,
}

impl Default for SyntheticPricing {
    fn default() -> Self {
        Self {
            entry_premium_pct: DEFAULT_ENTRY_PREMIUM_PCT,
            exit_markup: DEFAULT_EXIT_MARKUP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub window: usize,
    pub thresholds: SignalThresholds,
    pub pricing: SyntheticPricing,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            window: rsi::DEFAULT_WINDOW,
            thresholds: SignalThresholds::default(),
            pricing: SyntheticPricing::default(),
        }
    }
}

impl BacktestConfig {
    /// Closes needed before the oscillator has a single defined value.
    pub fn minimum_bars(&self) -> usize {
        self.window + 1
    }
}

/// One close and everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRow {
    pub date: NaiveDate,
    pub close: f64,
    pub avg_gain: Option<f64>,
    pub avg_loss: Option<f64>,
    pub oscillator: Option<f64>,
    pub entry_signal: bool,
    pub exit_signal: bool,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub daily_pnl: Option<f64>,
    pub cumulative_pnl: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub symbol: String,
    pub config: BacktestConfig,
    pub rows: Vec<BacktestRow>,
    pub trades: Vec<TradeRecord>,
}

impl BacktestResult {
    /// Dates with a defined cumulative P/L, for charting.
    pub fn cumulative_curve(&self) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.cumulative_pnl.map(|pnl| (r.date, pnl)))
            .collect()
    }

    /// Last defined cumulative P/L, or 0 when nothing was realized.
    pub fn final_pnl(&self) -> f64 {
        self.rows
            .iter()
            .rev()
            .find_map(|r| r.cumulative_pnl)
            .unwrap_or(0.0)
    }
}

/// Returns `(entry_price, exit_price)`.
pub fn synthetic_prices(
    closes: &[f64],
    entry: &[bool],
    exit: &[bool],
    pricing: &SyntheticPricing,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let entry_price: Vec<Option<f64>> = closes
        .iter()
        .zip(entry)
        .map(|(close, &is_entry)| is_entry.then(|| close * pricing.entry_premium_pct))
        .collect();

    let exit_price = (0..closes.len())
        .map(|i| {
            if i == 0 || !exit.get(i).copied().unwrap_or(false) {
                return None;
            }
            entry_price[i - 1].map(|prev| prev * pricing.exit_markup)
        })
        .collect();

    (entry_price, exit_price)
}

/// Returns `(daily, cumulative)`.
///
/// The running sum skips rows without a daily value and is only reported on
/// rows that have one.
pub fn profit_loss(
    entry_price: &[Option<f64>],
    exit_price: &[Option<f64>],
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let daily: Vec<Option<f64>> = entry_price
        .iter()
        .zip(exit_price)
        .map(|(entry, exit)| match (entry, exit) {
            (Some(entry), Some(exit)) => Some(exit - entry),
            _ => None,
        })
        .collect();

    let mut running = 0.0;
    let cumulative = daily
        .iter()
        .map(|d| {
            d.map(|pnl| {
                running += pnl;
                running
            })
        })
        .collect();

    (daily, cumulative)
}

pub fn extract_trades(rows: &[BacktestRow]) -> Vec<TradeRecord> {
    rows.iter()
        .filter(|r| r.entry_signal)
        .filter_map(|r| {
            Some(TradeRecord {
                date: r.date,
                close: r.close,
                oscillator: r.oscillator?,
                entry_price: r.entry_price?,
                exit_price: r.exit_price?,
                pnl: r.daily_pnl?,
            })
        })
        .collect()
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, OptdashError> {
    if series.len() < config.minimum_bars() {
        return Err(OptdashError::InsufficientData {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            minimum: config.minimum_bars(),
        });
    }

    let closes = series.closes();
    let (avg_gain, avg_loss) = rsi::average_gain_loss(closes, config.window);
    let oscillator = compute_oscillator(closes, config.window);
    let (entry, exit) = generate_signals(&oscillator, &config.thresholds);
    let (entry_price, exit_price) = synthetic_prices(closes, &entry, &exit, &config.pricing);
    let (daily, cumulative) = profit_loss(&entry_price, &exit_price);

    let rows: Vec<BacktestRow> = series
        .dates()
        .iter()
        .enumerate()
        .map(|(i, &date)| BacktestRow {
            date,
            close: closes[i],
            avg_gain: avg_gain[i],
            avg_loss: avg_loss[i],
            oscillator: oscillator[i],
            entry_signal: entry[i],
            exit_signal: exit[i],
            entry_price: entry_price[i],
            exit_price: exit_price[i],
            daily_pnl: daily[i],
            cumulative_pnl: cumulative[i],
        })
        .collect();

    let trades = extract_trades(&rows);
    debug!(
        symbol = series.symbol(),
        rows = rows.len(),
        entries = entry.iter().filter(|e| **e).count(),
        exits = exit.iter().filter(|e| **e).count(),
        trades = trades.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        symbol: series.symbol().to_string(),
        config: config.clone(),
        rows,
        trades,
    })
}
