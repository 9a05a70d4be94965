//! CLI definition and dispatch.

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report_adapter::SvgReportAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, BacktestResult, SyntheticPricing,
};
use crate::domain::config_validation::{
    is_valid_symbol, validate_backtest_config, validate_data_config, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_SYMBOL,
};
use crate::domain::error::OptdashError;
use crate::domain::indicator::rsi::DEFAULT_WINDOW;
use crate::domain::metrics::TradeSummary;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::option_chain::{ChainSummary, OptionChain};
use crate::domain::schedule::{format_countdown, next_occurrence, Countdown};
use crate::domain::signal::SignalThresholds;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Parser, Debug)]
#[command(name = "optdash", about = "Options dashboard toolkit")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show time remaining until the next jobs report release
    Countdown {
        /// Evaluate once as of this local time (YYYY-MM-DDTHH:MM:SS)
        #[arg(long, conflicts_with = "watch")]
        at: Option<String>,
        /// Refresh once per second until the report is released
        #[arg(long)]
        watch: bool,
    },
    /// Run the RSI toy backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarise an option chain
    Chain {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        expiration: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available option expirations
    Expirations {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Countdown { at, watch } => run_countdown(at.as_deref(), watch),
        Command::Backtest {
            config,
            symbol,
            end_date,
            output,
        } => run_backtest(&config, symbol.as_deref(), end_date.as_deref(), output.as_deref()),
        Command::Chain {
            config,
            symbol,
            expiration,
            output,
        } => run_chain(&config, symbol.as_deref(), expiration.as_deref(), output.as_deref()),
        Command::Expirations { config, symbol } => run_expirations(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(e: &OptdashError) -> ExitCode {
    eprintln!("error: {e}");
    e.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, OptdashError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn parse_date_arg(key: &str, value: &str) -> Result<NaiveDate, OptdashError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| OptdashError::ConfigInvalid {
        section: "cli".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

/// Symbol from the command line, else `[data] symbol`, else the default.
pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, OptdashError> {
    let symbol = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
    if !is_valid_symbol(&symbol) {
        return Err(OptdashError::ConfigInvalid {
            section: "data".into(),
            key: "symbol".into(),
            reason: format!("'{}' is not a valid ticker", symbol),
        });
    }
    Ok(symbol)
}

/// Output directory from the command line, else `[report] output_dir`.
pub fn resolve_output_dir(output: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    output.map(Path::to_path_buf).or_else(|| {
        config
            .get_string("report", "output_dir")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, OptdashError> {
    validate_backtest_config(config)?;
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        window: config.get_int("backtest", "window", DEFAULT_WINDOW as i64) as usize,
        thresholds: SignalThresholds {
            entry_above: config.get_double(
                "backtest",
                "entry_threshold",
                defaults.thresholds.entry_above,
            ),
            exit_below: config.get_double(
                "backtest",
                "exit_threshold",
                defaults.thresholds.exit_below,
            ),
        },
        pricing: SyntheticPricing {
            entry_premium_pct: config.get_double(
                "backtest",
                "entry_premium_pct",
                defaults.pricing.entry_premium_pct,
            ),
            exit_markup: config.get_double("backtest", "exit_markup", defaults.pricing.exit_markup),
        },
    })
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, OptdashError> {
    validate_data_config(config)?;
    let dir = config.require_string("data", "dir")?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn report_adapters() -> [Box<dyn ReportPort>; 2] {
    [Box::new(CsvReportAdapter::new()), Box::new(SvgReportAdapter::new())]
}

pub fn run_countdown(at: Option<&str>, watch: bool) -> ExitCode {
    let fixed_now = match at {
        Some(s) => match NaiveDateTime::parse_from_str(s.trim(), AT_FORMAT) {
            Ok(t) => Some(t),
            Err(_) => {
                return fail(&OptdashError::ConfigInvalid {
                    section: "cli".into(),
                    key: "at".into(),
                    reason: "invalid timestamp (expected YYYY-MM-DDTHH:MM:SS)".into(),
                });
            }
        },
        None => None,
    };
    let now = || fixed_now.unwrap_or_else(|| Local::now().naive_local());

    let target = next_occurrence(now().date());
    println!("Next jobs report: {}", target.format("%A %Y-%m-%d %H:%M"));

    if !watch {
        println!("{}", format_countdown(target, now()));
        return ExitCode::SUCCESS;
    }

    loop {
        let current = now();
        println!("{}", format_countdown(target, current));
        if Countdown::between(target, current).is_none() {
            return ExitCode::SUCCESS;
        }
        thread::sleep(Duration::from_secs(1));
    }
}

pub fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    end_date: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let data_port = match data_adapter(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let bt_config = match build_backtest_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    // Stage 2: Resolve symbol and date range
    let symbol = match resolve_symbol(symbol_override, &config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let end = match end_date {
        Some(d) => match parse_date_arg("end_date", d) {
            Ok(d) => d,
            Err(e) => return fail(&e),
        },
        None => Local::now().date_naive(),
    };
    let lookback = config.get_int("data", "lookback_days", DEFAULT_LOOKBACK_DAYS) as u64;

    // Stage 3: Run and report
    let result = match run_backtest_pipeline(&data_port, &symbol, end, lookback, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    print_backtest_summary(&result);

    match resolve_output_dir(output, &config) {
        Some(dir) => write_reports(&dir, |r| r.write_backtest(&result, &dir)),
        None => ExitCode::SUCCESS,
    }
}

/// Fetch `lookback_days` of bars ending at `end_date` and run the backtest.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    end_date: NaiveDate,
    lookback_days: u64,
    bt_config: &BacktestConfig,
) -> Result<BacktestResult, OptdashError> {
    let start_date = end_date
        .checked_sub_days(Days::new(lookback_days))
        .ok_or_else(|| OptdashError::ConfigInvalid {
            section: "data".into(),
            key: "lookback_days".into(),
            reason: format!("{} days before {} is out of range", lookback_days, end_date),
        })?;
    let bars = data_port.fetch_ohlcv(symbol, start_date, end_date)?;
    if bars.is_empty() {
        return Err(OptdashError::NoData {
            symbol: symbol.to_string(),
        });
    }
    let series = PriceSeries::from_bars(symbol, &bars)?;

    eprintln!(
        "Running backtest: {} {} bars, {} to {}",
        symbol,
        series.len(),
        start_date,
        end_date
    );
    backtest_engine::run_backtest(&series, bt_config)
}

fn print_backtest_summary(result: &BacktestResult) {
    let summary = TradeSummary::compute(result);
    let c = &result.config;

    println!("=== {} RSI Backtest ===", result.symbol);
    println!(
        "Window: {}  Entry > {}  Exit < {}",
        c.window, c.thresholds.entry_above, c.thresholds.exit_below
    );
    println!("Bars:          {}", summary.bars);
    println!("Entry Signals: {}", summary.entry_signals);
    println!("Exit Signals:  {}", summary.exit_signals);
    println!("Total Trades:  {}", summary.total_trades);
    println!("Win Rate:      {:.1}%", summary.win_rate * 100.0);
    println!("Total P/L:     {:.4}", summary.total_pnl);

    if result.trades.is_empty() {
        println!("No trades realized.");
        return;
    }

    println!("\n=== Trades ===");
    for t in &result.trades {
        println!(
            "  {}  close {:.2}  rsi {:.2}  entry {:.4}  exit {:.4}  pnl {:+.4}",
            t.date, t.close, t.oscillator, t.entry_price, t.exit_price, t.pnl
        );
    }
}

fn write_reports<F>(dir: &Path, write: F) -> ExitCode
where
    F: Fn(&dyn ReportPort) -> Result<Vec<PathBuf>, OptdashError>,
{
    for adapter in report_adapters() {
        match write(adapter.as_ref()) {
            Ok(paths) => {
                for p in paths {
                    eprintln!("Report written to: {}", p.display());
                }
            }
            Err(e) => return fail(&e),
        }
    }
    debug!(dir = %dir.display(), "reports complete");
    ExitCode::SUCCESS
}

pub fn run_chain(
    config_path: &Path,
    symbol_override: Option<&str>,
    expiration: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let data_port = match data_adapter(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let symbol = match resolve_symbol(symbol_override, &config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let expiration = match expiration.map(|d| parse_date_arg("expiration", d)).transpose() {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let (chain, summary) = match run_chain_pipeline(&data_port, &symbol, expiration) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    print_chain_summary(&summary);

    match resolve_output_dir(output, &config) {
        Some(dir) => write_reports(&dir, |r| r.write_chain(&chain, &dir)),
        None => ExitCode::SUCCESS,
    }
}

/// Load the chain for `expiration`, or the earliest listed one.
pub fn run_chain_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    expiration: Option<NaiveDate>,
) -> Result<(OptionChain, ChainSummary), OptdashError> {
    let expiration = match expiration {
        Some(d) => d,
        None => data_port
            .list_expirations(symbol)?
            .first()
            .copied()
            .ok_or_else(|| OptdashError::NoExpirations {
                symbol: symbol.to_string(),
            })?,
    };

    let chain = data_port.fetch_option_chain(symbol, expiration)?;
    let price = data_port.latest_price(symbol)?;
    let summary = chain.summary(price);
    Ok((chain, summary))
}

fn print_chain_summary(s: &ChainSummary) {
    println!("=== {} options expiring {} ===", s.symbol, s.expiration);
    match s.underlying_price {
        Some(p) => println!("Current Price: ${:.2}", p),
        None => println!("Current Price: unavailable"),
    }
    println!(
        "Calls:         {} contracts, volume {}",
        s.call_contracts, s.call_volume
    );
    println!(
        "Puts:          {} contracts, volume {}",
        s.put_contracts, s.put_volume
    );
}

pub fn run_expirations(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let data_port = match data_adapter(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let symbol = match resolve_symbol(symbol_override, &config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    match data_port.list_expirations(&symbol) {
        Ok(dates) if dates.is_empty() => fail(&OptdashError::NoExpirations { symbol }),
        Ok(dates) => {
            for d in dates {
                println!("{}", d);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let checks = validate_data_config(&config).and_then(|_| validate_backtest_config(&config));
    if let Err(e) = checks {
        return fail(&e);
    }

    println!("Configuration valid: {}", config_path.display());
    ExitCode::SUCCESS
}
