//! Integration tests for the data → backtest → report and chain pipelines.
//!
//! Tests cover:
//! - Backtest pipeline with a mock data port
//! - Lookback filtering and insufficient-data handling
//! - Option chain pipeline (expiration selection, summary)
//! - End-to-end over a CSV data directory with CSV and SVG reports

mod common;

use approx::assert_relative_eq;
use common::*;
use optdash::adapters::csv_adapter::CsvAdapter;
use optdash::adapters::csv_report_adapter::CsvReportAdapter;
use optdash::adapters::svg_report_adapter::SvgReportAdapter;
use optdash::cli::{run_backtest_pipeline, run_chain_pipeline};
use optdash::domain::backtest::BacktestConfig;
use optdash::domain::error::OptdashError;
use optdash::domain::metrics::TradeSummary;
use optdash::domain::signal::SignalThresholds;
use optdash::ports::report_port::ReportPort;
use std::fs;

fn overlapping_config() -> BacktestConfig {
    BacktestConfig {
        thresholds: SignalThresholds {
            entry_above: 70.0,
            exit_below: 101.0,
        },
        ..BacktestConfig::default()
    }
}

mod backtest_pipeline {
    use super::*;

    fn rising_port() -> MockDataPort {
        MockDataPort::new().with_bars("SPY", generate_bars("SPY", "2024-01-01", 20, 100.0))
    }

    #[test]
    fn default_thresholds_produce_no_trades() {
        let result = run_backtest_pipeline(
            &rising_port(),
            "SPY",
            date(2024, 1, 20),
            365,
            &BacktestConfig::default(),
        )
        .unwrap();

        assert_eq!(result.rows.len(), 20);
        assert!(result.trades.is_empty());
        assert_eq!(result.final_pnl(), 0.0);

        // the oscillator pins at 100 on a steady rise, so entries fire without exits
        let summary = TradeSummary::compute(&result);
        assert_eq!(summary.entry_signals, 6);
        assert_eq!(summary.exit_signals, 0);
    }

    #[test]
    fn overlapping_thresholds_realize_trades() {
        let result = run_backtest_pipeline(
            &rising_port(),
            "SPY",
            date(2024, 1, 20),
            365,
            &overlapping_config(),
        )
        .unwrap();

        // entries at 14..=19, exits need the previous day's entry
        assert_eq!(result.trades.len(), 5);
        let first = &result.trades[0];
        assert_eq!(first.date, date(2024, 1, 16));
        assert_relative_eq!(first.entry_price, 115.0 * 0.02);
        assert_relative_eq!(first.exit_price, 114.0 * 0.02 * 1.2);
        assert_relative_eq!(first.pnl, 114.0 * 0.02 * 1.2 - 115.0 * 0.02);

        let total: f64 = result.trades.iter().map(|t| t.pnl).sum();
        assert_relative_eq!(result.final_pnl(), total, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_only_on_realized_rows() {
        let result = run_backtest_pipeline(
            &rising_port(),
            "SPY",
            date(2024, 1, 20),
            365,
            &overlapping_config(),
        )
        .unwrap();

        for row in &result.rows {
            assert_eq!(row.daily_pnl.is_some(), row.cumulative_pnl.is_some());
        }
        assert_eq!(result.cumulative_curve().len(), result.trades.len());
    }

    #[test]
    fn lookback_limits_fetched_bars() {
        let err = run_backtest_pipeline(
            &rising_port(),
            "SPY",
            date(2024, 1, 20),
            10,
            &BacktestConfig::default(),
        )
        .unwrap_err();

        match err {
            OptdashError::InsufficientData { bars, minimum, .. } => {
                assert_eq!(bars, 11);
                assert_eq!(minimum, 15);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_lookback_is_config_error() {
        let err = run_backtest_pipeline(
            &rising_port(),
            "SPY",
            date(2024, 1, 20),
            200_000_000,
            &BacktestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptdashError::ConfigInvalid { ref key, .. } if key == "lookback_days"));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn missing_symbol_is_no_data() {
        let err = run_backtest_pipeline(
            &rising_port(),
            "QQQ",
            date(2024, 1, 20),
            365,
            &BacktestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptdashError::NoData { ref symbol } if symbol == "QQQ"));
        assert_eq!(err.exit_status(), 5);
    }

    #[test]
    fn data_errors_propagate() {
        let port = MockDataPort::new().with_error("SPY", "disk on fire");
        let err = run_backtest_pipeline(
            &port,
            "SPY",
            date(2024, 1, 20),
            365,
            &BacktestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptdashError::Data { .. }));
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn falling_prices_never_enter() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes("SPY", "2024-01-01", &closes));
        let result = run_backtest_pipeline(
            &port,
            "SPY",
            date(2024, 1, 30),
            365,
            &BacktestConfig::default(),
        )
        .unwrap();

        assert!(result.rows.iter().all(|r| !r.entry_signal));
        assert!(result.rows[14..].iter().all(|r| r.exit_signal));
        assert!(result.trades.is_empty());
    }
}

mod chain_pipeline {
    use super::*;

    #[test]
    fn defaults_to_earliest_expiration() {
        let port = MockDataPort::new()
            .with_bars("SPY", generate_bars("SPY", "2024-01-01", 5, 500.0))
            .with_chain(sample_chain("SPY", date(2024, 4, 19)))
            .with_chain(sample_chain("SPY", date(2024, 3, 15)));

        let (chain, summary) = run_chain_pipeline(&port, "SPY", None).unwrap();
        assert_eq!(chain.expiration, date(2024, 3, 15));
        assert_eq!(summary.underlying_price, Some(504.0));
        assert_eq!(summary.call_volume, 2000);
        assert_eq!(summary.put_volume, 900);
        assert_eq!(summary.call_contracts, 3);
        assert_eq!(summary.put_contracts, 1);
    }

    #[test]
    fn explicit_expiration_is_used() {
        let port = MockDataPort::new()
            .with_chain(sample_chain("SPY", date(2024, 4, 19)))
            .with_chain(sample_chain("SPY", date(2024, 3, 15)));

        let (chain, summary) = run_chain_pipeline(&port, "SPY", Some(date(2024, 4, 19))).unwrap();
        assert_eq!(chain.expiration, date(2024, 4, 19));
        assert_eq!(summary.underlying_price, None);
    }

    #[test]
    fn no_expirations_is_error() {
        let port = MockDataPort::new().with_chain(sample_chain("QQQ", date(2024, 4, 19)));
        let err = run_chain_pipeline(&port, "SPY", None).unwrap_err();
        assert!(matches!(err, OptdashError::NoExpirations { .. }));
    }

    #[test]
    fn iv_curve_sorted_by_strike() {
        let chain = sample_chain("SPY", date(2024, 4, 19));
        let strikes: Vec<f64> = chain
            .iv_curve(optdash::domain::option_chain::OptionSide::Call)
            .iter()
            .map(|p| p.0)
            .collect();
        assert_eq!(strikes, vec![500.0, 505.0, 510.0]);
    }
}

mod csv_end_to_end {
    use super::*;
    use std::fmt::Write as _;
    use tempfile::TempDir;

    const CHAIN_HEADER: &str = "strike,lastPrice,bid,ask,volume,openInterest,impliedVolatility\n";

    fn seed_data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut bars = String::from("date,open,high,low,close,volume\n");
        for bar in generate_bars("SPY", "2024-01-01", 20, 100.0) {
            writeln!(
                bars,
                "{},{},{},{},{},{}",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            )
            .unwrap();
        }
        fs::write(dir.path().join("SPY.csv"), bars).unwrap();

        fs::write(
            dir.path().join("SPY_2024-04-19_calls.csv"),
            format!("{CHAIN_HEADER}500.0,5.1,5.0,5.2,1200,3400,0.15\n505.0,2.4,2.3,2.5,,1800,0.14\n"),
        )
        .unwrap();
        fs::write(
            dir.path().join("SPY_2024-04-19_puts.csv"),
            format!("{CHAIN_HEADER}495.0,3.2,3.1,3.3,900,2500,0.19\n"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn backtest_reports_from_csv_directory() {
        let data = seed_data_dir();
        let out = TempDir::new().unwrap();
        let port = CsvAdapter::new(data.path().to_path_buf());

        let result =
            run_backtest_pipeline(&port, "SPY", date(2024, 1, 20), 365, &overlapping_config())
                .unwrap();
        assert_eq!(result.trades.len(), 5);

        let tables = CsvReportAdapter::new()
            .write_backtest(&result, out.path())
            .unwrap();
        let charts = SvgReportAdapter::new()
            .write_backtest(&result, out.path())
            .unwrap();

        assert!(out.path().join("SPY_backtest.csv").exists());
        assert!(out.path().join("SPY_trades.csv").exists());
        assert!(out.path().join("SPY_cumulative_pnl.svg").exists());
        assert_eq!(tables.len() + charts.len(), 3);

        let trades = fs::read_to_string(out.path().join("SPY_trades.csv")).unwrap();
        assert_eq!(trades.lines().count(), 6);
    }

    #[test]
    fn chain_reports_from_csv_directory() {
        let data = seed_data_dir();
        let out = TempDir::new().unwrap();
        let port = CsvAdapter::new(data.path().to_path_buf());

        let (chain, summary) = run_chain_pipeline(&port, "SPY", None).unwrap();
        assert_eq!(summary.expiration, date(2024, 4, 19));
        assert_eq!(summary.underlying_price, Some(119.0));
        assert_eq!(summary.call_volume, 1200);
        assert_eq!(summary.put_volume, 900);

        CsvReportAdapter::new()
            .write_chain(&chain, out.path())
            .unwrap();
        let charts = SvgReportAdapter::new()
            .write_chain(&chain, out.path())
            .unwrap();

        assert!(out.path().join("SPY_2024-04-19_calls.csv").exists());
        assert!(out.path().join("SPY_2024-04-19_puts.csv").exists());
        assert_eq!(charts.len(), 2);
        let svg = fs::read_to_string(out.path().join("SPY_2024-04-19_iv_puts.svg")).unwrap();
        assert!(svg.contains("Implied Volatility vs Strike Price (Puts)"));
    }
}
