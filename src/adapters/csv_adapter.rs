//! CSV directory data adapter.
//!
//! Layout under `base_path`:
//! - `{SYMBOL}.csv`: `date,open,high,low,close,volume`
//! - `{SYMBOL}_{YYYY-MM-DD}_calls.csv` and `_puts.csv`:
//!   `strike,lastPrice,bid,ask,volume,openInterest,impliedVolatility`

use crate::domain::error::OptdashError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::option_chain::{OptionChain, OptionContract, OptionSide};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BarRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractRow {
    strike: f64,
    last_price: f64,
    bid: f64,
    ask: f64,
    volume: Option<u64>,
    open_interest: Option<u64>,
    implied_volatility: f64,
}

impl From<ContractRow> for OptionContract {
    fn from(row: ContractRow) -> Self {
        OptionContract {
            strike: row.strike,
            last_price: row.last_price,
            bid: row.bid,
            ask: row.ask,
            volume: row.volume,
            open_interest: row.open_interest,
            implied_volatility: row.implied_volatility,
        }
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn chain_path(&self, symbol: &str, expiration: NaiveDate, side: OptionSide) -> PathBuf {
        self.base_path.join(format!(
            "{}_{}_{}.csv",
            symbol,
            expiration.format("%Y-%m-%d"),
            side.plural()
        ))
    }

    fn read(&self, path: &Path) -> Result<String, OptdashError> {
        fs::read_to_string(path).map_err(|e| OptdashError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }

    fn read_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, OptdashError> {
        let path = self.bars_path(symbol);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<BarRow>() {
            let row = result.map_err(|e| OptdashError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|e| {
                OptdashError::Data {
                    reason: format!("invalid date format '{}': {}", row.date, e),
                }
            })?;
            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn read_contracts(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        side: OptionSide,
    ) -> Result<Vec<OptionContract>, OptdashError> {
        let path = self.chain_path(symbol, expiration, side);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let contracts = rdr
            .deserialize::<ContractRow>()
            .map(|result| {
                result.map(OptionContract::from).map_err(|e| OptdashError::Data {
                    reason: format!("CSV parse error in {}: {}", path.display(), e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = %path.display(),
            contracts = contracts.len(),
            "loaded {}",
            side.plural()
        );
        Ok(contracts)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, OptdashError> {
        let bars: Vec<OhlcvBar> = self
            .read_bars(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        debug!(symbol, bars = bars.len(), %start_date, %end_date, "fetched bars");
        Ok(bars)
    }

    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, OptdashError> {
        Ok(self.read_bars(symbol)?.last().map(|b| b.close))
    }

    fn list_expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, OptdashError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| OptdashError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let prefix = format!("{}_", symbol);
        let suffix = format!("_{}.csv", OptionSide::Call.plural());
        let mut expirations = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| OptdashError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            let Some(date_part) = name_str
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&suffix))
            else {
                continue;
            };
            if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                expirations.push(date);
            }
        }

        expirations.sort();
        expirations.dedup();
        Ok(expirations)
    }

    fn fetch_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, OptdashError> {
        Ok(OptionChain {
            symbol: symbol.to_string(),
            expiration,
            calls: self.read_contracts(symbol, expiration, OptionSide::Call)?,
            puts: self.read_contracts(symbol, expiration, OptionSide::Put)?,
        })
    }
}
