//! Summary statistics for a backtest run.

use super::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub bars: usize,
    pub entry_signals: usize,
    pub exit_signals: usize,
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    pub total_pnl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub win_rate: f64,
}

impl TradeSummary {
    pub fn compute(result: &BacktestResult) -> Self {
        let rows = &result.rows;
        let trades = &result.trades;

        let entry_signals = rows.iter().filter(|r| r.entry_signal).count();
        let exit_signals = rows.iter().filter(|r| r.exit_signal).count();

        let mut winners = 0usize;
        let mut losers = 0usize;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            if trade.is_winner() {
                winners += 1;
                largest_win = largest_win.max(trade.pnl);
            } else if trade.is_loser() {
                losers += 1;
                largest_loss = largest_loss.max(trade.pnl.abs());
            }
        }

        let win_rate = if trades.is_empty() {
            0.0
        } else {
            winners as f64 / trades.len() as f64
        };

        Self {
            bars: rows.len(),
            entry_signals,
            exit_signals,
            total_trades: trades.len(),
            winners,
            losers,
            total_pnl: result.final_pnl(),
            largest_win,
            largest_loss,
            win_rate,
        }
    }
}
