//! Threshold entry/exit signals from the oscillator.
//!
//! Signals are per-day predicates with no position state: consecutive entry
//! days and exits without a prior entry are both possible.

pub const DEFAULT_ENTRY_THRESHOLD: f64 = 70.0;
pub const DEFAULT_EXIT_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    /// Entry when the oscillator is strictly above this level.
    pub entry_above: f64,
    /// Exit when the oscillator is strictly below this level.
    pub exit_below: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            entry_above: DEFAULT_ENTRY_THRESHOLD,
            exit_below: DEFAULT_EXIT_THRESHOLD,
        }
    }
}

/// Returns `(entry, exit)` flags. Undefined oscillator values produce `false`.
pub fn generate_signals(
    oscillator: &[Option<f64>],
    thresholds: &SignalThresholds,
) -> (Vec<bool>, Vec<bool>) {
    let entry = oscillator
        .iter()
        .map(|v| v.is_some_and(|osc| osc > thresholds.entry_above))
        .collect();
    let exit = oscillator
        .iter()
        .map(|v| v.is_some_and(|osc| osc < thresholds.exit_below))
        .collect();
    (entry, exit)
}
