use crate::error::StrategyError;
use crate::Strategy;
use configuration::CrossoverParams;
use core_types::{PricePoint, Signal, SignaledPoint};

/// The two-window Simple Moving Average crossover strategy.
///
/// Long while the short-window mean is strictly above the long-window mean, flat
/// otherwise. No signal is taken before row `short_window` (zero-based), and a row
/// whose long mean is still warming up is always flat.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    params: CrossoverParams,
}

impl SmaCrossover {
    /// Creates a new `SmaCrossover` instance with the given parameters.
    ///
    /// It performs validation to ensure the parameters are logical.
    pub fn new(params: CrossoverParams) -> Result<Self, StrategyError> {
        // Validation: Ensure periods are logical.
        if params.short_window == 0 {
            return Err(StrategyError::InvalidParameters(
                "Short MA period must be greater than zero".to_string(),
            ));
        }
        if params.short_window >= params.long_window {
            return Err(StrategyError::InvalidParameters(
                "Short MA period must be less than Long MA period".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// First zero-based row that may carry a long signal.
    pub fn signal_start(&self) -> usize {
        self.params.short_window
    }
}

/// Trailing mean of the `window` values ending at `end` (inclusive), or `None` while
/// fewer than `window` values exist.
///
/// Summed as offsets from the window's first value, so a window of identical
/// closes averages to exactly that close.
fn trailing_mean(values: &[f64], end: usize, window: usize) -> Option<f64> {
    if end + 1 < window {
        return None;
    }
    let slice = &values[end + 1 - window..=end];
    let anchor = slice[0];
    let offset: f64 = slice.iter().map(|v| v - anchor).sum();
    Some(anchor + offset / window as f64)
}

/// `short > long`, where an undefined mean is never greater than anything.
fn is_above(short_mean: Option<f64>, long_mean: Option<f64>) -> bool {
    match (short_mean, long_mean) {
        (Some(short), Some(long)) => short > long,
        _ => false,
    }
}

impl Strategy for SmaCrossover {
    fn derive_signals(&self, prices: &[PricePoint]) -> Result<Vec<SignaledPoint>, StrategyError> {
        let short_window = self.params.short_window;
        let long_window = self.params.long_window;

        // Gaps are dropped before any window sees them.
        let (dates, closes): (Vec<_>, Vec<f64>) = prices
            .iter()
            .filter_map(|p| p.close.filter(|c| c.is_finite()).map(|close| (p.date, close)))
            .unzip();

        let mut previous = Signal::Flat;
        let mut signaled = Vec::with_capacity(closes.len());

        for (i, (&date, &close)) in dates.iter().zip(&closes).enumerate() {
            let short_mean = trailing_mean(&closes, i, short_window);
            let long_mean = trailing_mean(&closes, i, long_window);

            let signal = if i >= self.signal_start() && is_above(short_mean, long_mean) {
                Signal::Long
            } else {
                Signal::Flat
            };
            let transition = if i == 0 { 0 } else { signal.transition_from(previous) };
            previous = signal;

            signaled.push(SignaledPoint {
                date,
                close,
                short_mean,
                long_mean,
                signal,
                transition,
            });
        }

        tracing::debug!(
            rows = signaled.len(),
            dropped = prices.len() - signaled.len(),
            long_days = signaled.iter().filter(|p| p.signal == Signal::Long).count(),
            "SmaCrossover: signals derived"
        );

        Ok(signaled)
    }
}
