//! Trade records extracted from a backtest.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub oscillator: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < 0.0
    }
}
