//! Daily OHLCV bars and the close-price series derived from them.

use chrono::NaiveDate;

use crate::domain::error::OptdashError;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Chronologically ordered `(date, close)` pairs for one underlying.
///
/// Dates are strictly increasing. Gaps between trading days are neither
/// assumed nor required.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(
        symbol: impl Into<String>,
        points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, OptdashError> {
        let symbol = symbol.into();
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(OptdashError::UnorderedSeries {
                    symbol,
                    date: pair[1].0,
                });
            }
        }
        let (dates, closes) = points.into_iter().unzip();
        Ok(Self {
            symbol,
            dates,
            closes,
        })
    }

    pub fn from_bars(symbol: impl Into<String>, bars: &[OhlcvBar]) -> Result<Self, OptdashError> {
        Self::new(symbol, bars.iter().map(|b| (b.date, b.close)).collect())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close, used as the current underlying price.
    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}
