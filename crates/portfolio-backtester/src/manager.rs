use crate::aggregate::aggregate;
use crate::data_handler::{load_each, normalize_symbols, SymbolOutcome};
use crate::error::PortfolioError;
use crate::report::{PerformanceReport, SymbolFailure};
use analytics::{AnalyticsEngine, RiskMetrics};
use api_client::{LookbackWindow, PriceProvider};
use backtester::Backtester;
use chrono::NaiveDate;
use configuration::{Config, FailurePolicy};
use core_types::{ClosePoint, PricePoint, SymbolPortfolio};
use std::sync::Arc;
use strategies::SmaCrossover;

/// Per-symbol results of one batch after the failure policy has been applied.
struct Settled<T> {
    loaded: Vec<T>,
    skipped: Vec<String>,
    failures: Vec<SymbolFailure>,
}

/// The entry point for multi-symbol requests.
///
/// Every call computes a fresh lookback window, loads each symbol concurrently,
/// and runs the single-symbol pipeline on whatever came back. Nothing is cached
/// between calls.
pub struct PerformanceService {
    provider: Arc<dyn PriceProvider>,
    backtester: Backtester,
    analytics: AnalyticsEngine,
    lookback_months: u32,
    on_failure: FailurePolicy,
    as_of: Option<NaiveDate>,
}

impl PerformanceService {
    /// Builds the service from a validated configuration.
    pub fn new(config: &Config, provider: Arc<dyn PriceProvider>) -> Result<Self, PortfolioError> {
        let strategy = SmaCrossover::new(config.strategy)?;
        Ok(Self {
            provider,
            backtester: Backtester::new(Arc::new(strategy), config.simulation),
            analytics: AnalyticsEngine::new(),
            lookback_months: config.provider.lookback_months,
            on_failure: config.batch.on_failure,
            as_of: None,
        })
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Pins the end of the lookback window instead of using today's date.
    pub fn as_of(mut self, end: NaiveDate) -> Self {
        self.as_of = Some(end);
        self
    }

    /// The `[start, end)` window shared by every symbol of the next request.
    pub fn window(&self) -> Result<LookbackWindow, PortfolioError> {
        match self.as_of {
            Some(end) => LookbackWindow::ending(end, self.lookback_months),
            None => LookbackWindow::ending_today(self.lookback_months),
        }
        .map_err(PortfolioError::Window)
    }

    /// Simulates every symbol and sums the books per date.
    pub async fn compute_performance<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<PerformanceReport, PortfolioError> {
        let settled = self.run_batch(symbols, |symbol, prices| self.simulate(symbol, &prices)).await?;
        let series = aggregate(&settled.loaded);

        tracing::info!(
            symbols = settled.loaded.len(),
            skipped = settled.skipped.len(),
            failed = settled.failures.len(),
            dates = series.len(),
            "Performance computed"
        );

        Ok(PerformanceReport {
            series,
            skipped: settled.skipped,
            failures: settled.failures,
        })
    }

    /// The raw closes of every symbol, grouped by symbol in request order.
    ///
    /// Gaps and non-finite closes are left out.
    pub async fn compute_close_series<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<Vec<ClosePoint>, PortfolioError> {
        let settled = self
            .run_batch(symbols, |symbol, prices| Ok(close_points(symbol, &prices)))
            .await?;
        let points: Vec<ClosePoint> = settled.loaded.into_iter().flatten().collect();

        tracing::info!(rows = points.len(), "Close series computed");
        Ok(points)
    }

    /// Risk statistics per symbol, in request order.
    pub async fn compute_risk_metrics<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<Vec<RiskMetrics>, PortfolioError> {
        let settled = self
            .run_batch(symbols, |symbol, prices| {
                let portfolio = self.simulate(symbol, &prices)?;
                Ok(self.analytics.calculate(&portfolio))
            })
            .await?;

        tracing::info!(symbols = settled.loaded.len(), "Risk metrics computed");
        Ok(settled.loaded)
    }

    fn simulate(&self, symbol: &str, prices: &[PricePoint]) -> Result<SymbolPortfolio, PortfolioError> {
        self.backtester
            .run(symbol, prices)
            .map_err(|source| PortfolioError::Simulation {
                symbol: symbol.to_string(),
                source,
            })
    }

    async fn run_batch<S, T, F>(&self, symbols: &[S], process: F) -> Result<Settled<T>, PortfolioError>
    where
        S: AsRef<str>,
        F: Fn(&str, Vec<PricePoint>) -> Result<T, PortfolioError>,
    {
        let symbols = normalize_symbols(symbols)?;
        let window = self.window()?;
        let outcomes = load_each(&*self.provider, &symbols, window, process).await;
        self.settle(outcomes)
    }

    /// Applies the failure policy to per-symbol outcomes, keeping request order.
    fn settle<T>(&self, outcomes: Vec<(String, SymbolOutcome<T>)>) -> Result<Settled<T>, PortfolioError> {
        let mut settled = Settled {
            loaded: Vec::with_capacity(outcomes.len()),
            skipped: Vec::new(),
            failures: Vec::new(),
        };

        for (symbol, outcome) in outcomes {
            match outcome {
                SymbolOutcome::Loaded(value) => settled.loaded.push(value),
                SymbolOutcome::Empty => {
                    tracing::warn!(%symbol, "No price data in window; symbol skipped");
                    settled.skipped.push(symbol);
                }
                SymbolOutcome::Failed(error) => match self.on_failure {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Skip => {
                        tracing::warn!(%symbol, %error, "Symbol failed; continuing without it");
                        settled.failures.push(SymbolFailure {
                            symbol,
                            reason: error.to_string(),
                        });
                    }
                },
            }
        }

        Ok(settled)
    }
}

fn close_points(symbol: &str, prices: &[PricePoint]) -> Vec<ClosePoint> {
    prices
        .iter()
        .filter_map(|p| {
            p.close.filter(|c| c.is_finite()).map(|close| ClosePoint {
                date: p.date,
                close,
                symbol: symbol.to_string(),
            })
        })
        .collect()
}
