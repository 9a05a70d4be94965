//! Technical indicators over close-price series.
//!
//! Every indicator returns one value per input close. Positions without
//! enough history are `None` rather than a numeric placeholder.

pub mod rsi;

/// Day-over-day differences. Index 0 has no predecessor and is `None`.
pub fn price_changes(closes: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return changes;
    }
    changes.push(None);
    changes.extend(closes.windows(2).map(|pair| Some(pair[1] - pair[0])));
    changes
}

/// Simple mean of the trailing `window` defined values.
///
/// `values[i]` is averaged over `values[i + 1 - window..=i]`; the result is
/// `None` unless every value in that span is defined.
pub fn trailing_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        let span = &values[i + 1 - window..=i];
        let sum: Option<f64> = span.iter().copied().sum();
        out.push(sum.map(|s| s / window as f64));
    }
    out
}
