use crate::enums::Signal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close as delivered by a price provider.
///
/// `close` is `None` when the provider reported a gap for that trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    /// A trading day the provider listed without a usable close.
    pub fn missing(date: NaiveDate) -> Self {
        Self { date, close: None }
    }
}

/// A clean price point annotated with both rolling means and the derived signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignaledPoint {
    pub date: NaiveDate,
    pub close: f64,
    /// Trailing mean over the short window; `None` until the window is full.
    pub short_mean: Option<f64>,
    /// Trailing mean over the long window; `None` until the window is full.
    pub long_mean: Option<f64>,
    pub signal: Signal,
    /// First difference of `signal` (0 on the first row). Internal to the simulator.
    #[serde(skip)]
    pub transition: i8,
}

/// One day of the simulated book for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Shares held at the close.
    pub position: f64,
    pub holdings: f64,
    pub cash: f64,
    pub total: f64,
    /// Fractional change of `total` versus the previous row.
    pub returns: f64,
}

/// The simulated series for one symbol, the unit the aggregator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPortfolio {
    pub symbol: String,
    pub rows: Vec<PortfolioRow>,
}

/// Portfolio components summed across every symbol reporting a given date.
///
/// A component is `None` when no contributing symbol had a finite value for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    pub date: NaiveDate,
    pub holdings: Option<f64>,
    pub cash: Option<f64>,
    pub total: Option<f64>,
}

/// A raw close, tagged with its symbol, for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub symbol: String,
}
