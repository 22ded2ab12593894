//! # Trendfolio Analytics Engine
//!
//! Risk statistics for a simulated symbol: annualised volatility and Sharpe ratio of
//! the close series, drawdown and total return of the simulated book.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a finished
//!   `SymbolPortfolio` and produces a `RiskMetrics`; nothing is retained between calls.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, ROLLING_VOLATILITY_WINDOW, TRADING_DAYS_PER_YEAR};
pub use report::{RiskMetrics, VolatilityPoint};
