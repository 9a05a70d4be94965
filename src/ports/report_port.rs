//! Report output port trait.

use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::OptdashError;
use crate::domain::option_chain::OptionChain;

/// Port for rendering backtest and option-chain output into a directory.
///
/// Each call returns the paths it wrote.
pub trait ReportPort {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError>;

    fn write_chain(
        &self,
        chain: &OptionChain,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, OptdashError>;
}
