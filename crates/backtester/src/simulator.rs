use crate::error::BacktestError;
use configuration::SimulationParams;
use core_types::{PortfolioRow, SignaledPoint};

/// Converts a signal sequence into the daily cash/holdings book of one symbol.
///
/// Row by row:
/// - `position = unit_size * signal`
/// - `holdings = position * close`
/// - `cash = starting_cash - Σ (Δposition * close)`, with Δposition taken from the
///   signal transition (0 on the first row)
/// - `total = cash + holdings`
/// - `returns = total / previous_total - 1`, or 0 on the first row and whenever the
///   previous total is zero
///
/// Input must be strictly ascending by date.
pub fn simulate(
    signals: &[SignaledPoint],
    params: &SimulationParams,
) -> Result<Vec<PortfolioRow>, BacktestError> {
    if let Some(pair) = signals.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(BacktestError::UnorderedInput(pair[1].date.to_string()));
    }

    let mut rows = Vec::with_capacity(signals.len());
    let mut traded_value = 0.0;
    let mut previous_total: Option<f64> = None;

    for point in signals {
        let position = params.unit_size * point.signal.factor();
        let delta_position = params.unit_size * f64::from(point.transition);
        traded_value += delta_position * point.close;

        let holdings = position * point.close;
        let cash = params.starting_cash - traded_value;
        let total = cash + holdings;
        let returns = match previous_total {
            Some(previous) if previous != 0.0 => {
                let change = total / previous - 1.0;
                if change.is_finite() { change } else { 0.0 }
            }
            _ => 0.0,
        };
        previous_total = Some(total);

        rows.push(PortfolioRow {
            date: point.date,
            close: point.close,
            position,
            holdings,
            cash,
            total,
            returns,
        });
    }

    Ok(rows)
}
