//! SVG chart report adapter implementing ReportPort.
//!
//! Backtests get a cumulative P/L chart; option chains get one implied
//! volatility vs strike chart per side. Empty series produce no file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::adapters::chart_svg::{render_line_chart, LineChart};
use crate::domain::backtest::BacktestResult;
use crate::domain::error::OptdashError;
use crate::domain::option_chain::{OptionChain, OptionSide};
use crate::ports::report_port::ReportPort;

pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_svg(path: &Path, svg: &str) -> Result<bool, OptdashError> {
    if svg.is_empty() {
        warn!(path = %path.display(), "nothing to plot, skipping chart");
        return Ok(false);
    }
    fs::write(path, svg).map_err(|e| OptdashError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    })?;
    Ok(true)
}

impl ReportPort for SvgReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError> {
        fs::create_dir_all(output_dir)?;

        // x axis is days since the first row so gaps in trading days stay visible
        let origin = result.rows.first().map(|r| r.date);
        let points: Vec<(f64, f64)> = result
            .cumulative_curve()
            .into_iter()
            .filter_map(|(date, pnl)| origin.map(|o| ((date - o).num_days() as f64, pnl)))
            .collect();

        let title = format!("{} Cumulative P/L", result.symbol);
        let svg = render_line_chart(
            &LineChart {
                title: &title,
                x_label: "Days since start",
                y_label: "Cumulative P/L",
            },
            &points,
        );

        let path = output_dir.join(format!("{}_cumulative_pnl.svg", result.symbol));
        let mut written = Vec::new();
        if write_svg(&path, &svg)? {
            info!(path = %path.display(), "wrote cumulative P/L chart");
            written.push(path);
        }
        Ok(written)
    }

    fn write_chain(
        &self,
        chain: &OptionChain,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError> {
        fs::create_dir_all(output_dir)?;

        let mut written = Vec::new();
        for side in OptionSide::ALL {
            let title = format!("Implied Volatility vs Strike Price ({}s)", side);
            let svg = render_line_chart(
                &LineChart {
                    title: &title,
                    x_label: "Strike Price",
                    y_label: "Implied Volatility",
                },
                &chain.iv_curve(side),
            );
            let path = output_dir.join(format!(
                "{}_{}_iv_{}.svg",
                chain.symbol,
                chain.expiration.format("%Y-%m-%d"),
                side.plural()
            ));
            if write_svg(&path, &svg)? {
                written.push(path);
            }
        }

        info!(charts = written.len(), "wrote implied volatility charts");
        Ok(written)
    }
}
