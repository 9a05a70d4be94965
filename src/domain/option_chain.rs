//! Option chain for a single underlying and expiration.
//!
//! Contract fields are passed through unchanged from the data source;
//! implied volatility in particular is never computed here.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub const ALL: [OptionSide; 2] = [OptionSide::Call, OptionSide::Put];

    /// Plural used in file names and table headings.
    pub fn plural(&self) -> &'static str {
        match self {
            OptionSide::Call => "calls",
            OptionSide::Put => "puts",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => write!(f, "Call"),
            OptionSide::Put => write!(f, "Put"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionContract {
    pub strike: f64,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
    pub implied_volatility: f64,
}

#[derive(Debug, Clone)]
pub struct OptionChain {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

/// Headline numbers shown above the chain tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSummary {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub underlying_price: Option<f64>,
    pub call_volume: u64,
    pub put_volume: u64,
    pub call_contracts: usize,
    pub put_contracts: usize,
}

impl OptionChain {
    pub fn contracts(&self, side: OptionSide) -> &[OptionContract] {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    /// Missing volumes contribute nothing.
    pub fn total_volume(&self, side: OptionSide) -> u64 {
        self.contracts(side).iter().filter_map(|c| c.volume).sum()
    }

    /// `(strike, implied_volatility)` pairs ordered by strike.
    pub fn iv_curve(&self, side: OptionSide) -> Vec<(f64, f64)> {
        let mut curve: Vec<(f64, f64)> = self
            .contracts(side)
            .iter()
            .map(|c| (c.strike, c.implied_volatility))
            .collect();
        curve.sort_by(|a, b| a.0.total_cmp(&b.0));
        curve
    }

    pub fn summary(&self, underlying_price: Option<f64>) -> ChainSummary {
        ChainSummary {
            symbol: self.symbol.clone(),
            expiration: self.expiration,
            underlying_price,
            call_volume: self.total_volume(OptionSide::Call),
            put_volume: self.total_volume(OptionSide::Put),
            call_contracts: self.calls.len(),
            put_contracts: self.puts.len(),
        }
    }
}
