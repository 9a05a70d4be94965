#![allow(dead_code)]

use chrono::NaiveDate;
pub use optdash::domain::ohlcv::OhlcvBar;
use optdash::domain::error::OptdashError;
use optdash::domain::option_chain::{OptionChain, OptionContract};
use optdash::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub chains: HashMap<(String, NaiveDate), OptionChain>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            chains: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_chain(mut self, chain: OptionChain) -> Self {
        self.chains
            .insert((chain.symbol.clone(), chain.expiration), chain);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), OptdashError> {
        match self.errors.get(symbol) {
            Some(reason) => Err(OptdashError::Data {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, OptdashError> {
        self.check(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, OptdashError> {
        self.check(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .and_then(|bars| bars.iter().max_by_key(|b| b.date))
            .map(|b| b.close))
    }

    fn list_expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, OptdashError> {
        self.check(symbol)?;
        let mut dates: Vec<NaiveDate> = self
            .chains
            .keys()
            .filter(|(s, _)| s == symbol)
            .map(|(_, d)| *d)
            .collect();
        dates.sort();
        Ok(dates)
    }

    fn fetch_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, OptdashError> {
        self.check(symbol)?;
        self.chains
            .get(&(symbol.to_string(), expiration))
            .cloned()
            .ok_or_else(|| OptdashError::Data {
                reason: format!("no chain for {} {}", symbol, expiration),
            })
    }
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day with closes following `closes`.
pub fn bars_from_closes(symbol: &str, start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// Steadily rising closes, one per calendar day.
pub fn generate_bars(
    symbol: &str,
    start_date: &str,
    count: usize,
    start_price: f64,
) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(symbol, start_date, &closes)
}

pub fn contract(strike: f64, volume: Option<u64>, iv: f64) -> OptionContract {
    OptionContract {
        strike,
        last_price: 1.0,
        bid: 0.95,
        ask: 1.05,
        volume,
        open_interest: Some(100),
        implied_volatility: iv,
    }
}

pub fn sample_chain(symbol: &str, expiration: NaiveDate) -> OptionChain {
    OptionChain {
        symbol: symbol.to_string(),
        expiration,
        calls: vec![
            contract(505.0, Some(800), 0.14),
            contract(500.0, Some(1200), 0.15),
            contract(510.0, None, 0.13),
        ],
        puts: vec![contract(495.0, Some(900), 0.19)],
    }
}
