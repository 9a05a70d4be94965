//! Market data port trait.

use crate::domain::error::OptdashError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::option_chain::OptionChain;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` within `[start_date, end_date]`, oldest first.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, OptdashError>;

    /// Last traded price of the underlying, if any is known.
    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, OptdashError>;

    /// Available option expirations, earliest first.
    fn list_expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, OptdashError>;

    fn fetch_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, OptdashError>;
}
