use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Annualised volatility of the 21 returns before `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub volatility: Option<f64>,
}

/// Risk and return figures for one symbol's simulated run.
///
/// Every metric is `Option` because short or degenerate series leave it undefined;
/// `None` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub symbol: String,
    /// Number of clean closes the metrics were computed from.
    pub observations: usize,

    // I. Price Risk (close-to-close)
    /// Annualised standard deviation of daily close returns.
    pub volatility: Option<f64>,
    /// Annualised Sharpe ratio of daily close returns, zero risk-free rate.
    pub sharpe: Option<f64>,
    /// The last value of `rolling_volatility`.
    pub recent_volatility: Option<f64>,
    /// One entry per daily return, dated by the later close. Each value covers the 21
    /// returns before that day; the first 21 entries are `None`.
    pub rolling_volatility: Vec<VolatilityPoint>,

    // II. Strategy Outcome (simulated total)
    pub final_total: Option<f64>,
    pub total_return_pct: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
}

impl RiskMetrics {
    /// A report with no observations.
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            observations: 0,
            volatility: None,
            sharpe: None,
            recent_volatility: None,
            rolling_volatility: Vec::new(),
            final_total: None,
            total_return_pct: None,
            max_drawdown_pct: None,
        }
    }
}
