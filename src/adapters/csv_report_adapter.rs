//! CSV table report adapter implementing ReportPort.
//!
//! Missing values are written as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::backtest::{BacktestResult, BacktestRow};
use crate::domain::error::OptdashError;
use crate::domain::option_chain::{OptionChain, OptionContract, OptionSide};
use crate::domain::trade::TradeRecord;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct RowRecord {
    date: String,
    close: f64,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
    rsi: Option<f64>,
    entry_signal: bool,
    exit_signal: bool,
    entry_price: Option<f64>,
    exit_price: Option<f64>,
    daily_pnl: Option<f64>,
    cumulative_pnl: Option<f64>,
}

impl From<&BacktestRow> for RowRecord {
    fn from(row: &BacktestRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            close: row.close,
            avg_gain: row.avg_gain,
            avg_loss: row.avg_loss,
            rsi: row.oscillator,
            entry_signal: row.entry_signal,
            exit_signal: row.exit_signal,
            entry_price: row.entry_price,
            exit_price: row.exit_price,
            daily_pnl: row.daily_pnl,
            cumulative_pnl: row.cumulative_pnl,
        }
    }
}

#[derive(Serialize)]
struct TradeRow {
    date: String,
    close: f64,
    rsi: f64,
    entry_price: f64,
    exit_price: f64,
    pnl: f64,
}

impl From<&TradeRecord> for TradeRow {
    fn from(trade: &TradeRecord) -> Self {
        Self {
            date: trade.date.format("%Y-%m-%d").to_string(),
            close: trade.close,
            rsi: trade.oscillator,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            pnl: trade.pnl,
        }
    }
}

#[derive(Serialize)]
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

impl From<&OptionContract> for ContractRow {
    fn from(c: &OptionContract) -> Self {
        Self {
            strike: c.strike,
            last_price: c.last_price,
            bid: c.bid,
            ask: c.ask,
            volume: c.volume,
            open_interest: c.open_interest,
            implied_volatility: c.implied_volatility,
        }
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_records<T: Serialize>(
    path: &Path,
    headers: &[&str],
    records: impl IntoIterator<Item = T>,
) -> Result<(), OptdashError> {
    let report_err = |e: csv::Error| OptdashError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    // Headers are written by hand so empty tables still get a header line.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(report_err)?;
    wtr.write_record(headers).map_err(report_err)?;
    for record in records {
        wtr.serialize(record).map_err(report_err)?;
    }
    wtr.flush()?;
    Ok(())
}

const ROW_HEADERS: &[&str] = &[
    "date",
    "close",
    "avg_gain",
    "avg_loss",
    "rsi",
    "entry_signal",
    "exit_signal",
    "entry_price",
    "exit_price",
    "daily_pnl",
    "cumulative_pnl",
];

const TRADE_HEADERS: &[&str] = &["date", "close", "rsi", "entry_price", "exit_price", "pnl"];

const CONTRACT_HEADERS: &[&str] = &[
    "strike",
    "lastPrice",
    "bid",
    "ask",
    "volume",
    "openInterest",
    "impliedVolatility",
];

impl ReportPort for CsvReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError> {
        fs::create_dir_all(output_dir)?;

        let rows_path = output_dir.join(format!("{}_backtest.csv", result.symbol));
        write_records(
            &rows_path,
            ROW_HEADERS,
            result.rows.iter().map(RowRecord::from),
        )?;

        let trades_path = output_dir.join(format!("{}_trades.csv", result.symbol));
        write_records(
            &trades_path,
            TRADE_HEADERS,
            result.trades.iter().map(TradeRow::from),
        )?;

        info!(
            rows = result.rows.len(),
            trades = result.trades.len(),
            dir = %output_dir.display(),
            "wrote backtest tables"
        );
        Ok(vec![rows_path, trades_path])
    }

    fn write_chain(
        &self,
        chain: &OptionChain,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError> {
        fs::create_dir_all(output_dir)?;

        let mut written = Vec::new();
        for side in OptionSide::ALL {
            let path = output_dir.join(format!(
                "{}_{}_{}.csv",
                chain.symbol,
                chain.expiration.format("%Y-%m-%d"),
                side.plural()
            ));
            write_records(
                &path,
                CONTRACT_HEADERS,
                chain.contracts(side).iter().map(ContractRow::from),
            )?;
            written.push(path);
        }

        info!(dir = %output_dir.display(), "wrote option chain tables");
        Ok(written)
    }
}
