//! RSI-style momentum oscillator.
//!
//! Average gain and loss are simple means over the trailing `window`
//! price changes (not Wilder's smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: index `i` is defined once `i >= window`.

use super::{price_changes, trailing_mean};

pub const DEFAULT_WINDOW: usize = 14;

/// Trailing average gain and average loss per close.
pub fn average_gain_loss(closes: &[f64], window: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let changes = price_changes(closes);
    let gains: Vec<Option<f64>> = changes
        .iter()
        .map(|c| c.map(|change| if change > 0.0 { change } else { 0.0 }))
        .collect();
    let losses: Vec<Option<f64>> = changes
        .iter()
        .map(|c| c.map(|change| if change < 0.0 { -change } else { 0.0 }))
        .collect();

    (trailing_mean(&gains, window), trailing_mean(&losses, window))
}

pub fn compute_oscillator(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let (avg_gain, avg_loss) = average_gain_loss(closes, window);
    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(oscillator_value(*gain, *loss)),
            _ => None,
        })
        .collect()
}

fn oscillator_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
