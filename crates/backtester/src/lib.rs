use crate::error::BacktestError;
use configuration::SimulationParams;
use core_types::{PricePoint, SymbolPortfolio};
use std::sync::Arc;
use strategies::Strategy;

pub mod error;
pub mod simulator;

pub use simulator::simulate;

/// Runs the per-symbol half of the pipeline: signals, then the simulated book.
///
/// Holds no per-run state, so one instance is shared by every symbol of a batch.
#[derive(Clone)]
pub struct Backtester {
    strategy: Arc<dyn Strategy>,
    params: SimulationParams,
}

impl Backtester {
    pub fn new(strategy: Arc<dyn Strategy>, params: SimulationParams) -> Self {
        Self { strategy, params }
    }

    /// Derives signals for `prices` and simulates the resulting position.
    pub fn run(&self, symbol: &str, prices: &[PricePoint]) -> Result<SymbolPortfolio, BacktestError> {
        let signals = self.strategy.derive_signals(prices)?;
        let rows = simulate(&signals, &self.params)?;

        if let Some(last) = rows.last() {
            tracing::debug!(
                symbol,
                rows = rows.len(),
                final_total = last.total,
                "Simulation complete"
            );
        }

        Ok(SymbolPortfolio {
            symbol: symbol.to_string(),
            rows,
        })
    }
}
