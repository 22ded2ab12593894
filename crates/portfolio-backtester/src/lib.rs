//! # Trendfolio Portfolio Backtester
//!
//! The top of the pipeline. It takes a list of symbols, loads each one over a
//! shared lookback window, runs the single-symbol backtest on every series, and
//! folds the results into one combined book.
//!
//! ## Architectural Principles
//!
//! - **Fan-out, then reduce:** Each symbol is loaded and simulated in its own future;
//!   the only cross-symbol step is the per-date sum in `aggregate`, which does not
//!   depend on the order results arrive in.
//! - **Explicit partial success:** Symbols with no data are listed in `skipped`.
//!   Provider failures either abort the request or land in `failures`, as chosen by
//!   `FailurePolicy`.
//!
//! ## Public API
//!
//! - `PerformanceService`: `compute_performance`, `compute_close_series` and
//!   `compute_risk_metrics`.
//! - `parse_symbols`: turns a comma-separated query into a normalized symbol list.
//! - `aggregate`: the per-date reduction over simulated portfolios.

pub mod aggregate;
pub mod data_handler;
pub mod error;
pub mod manager;
pub mod report;

pub use aggregate::aggregate;
pub use data_handler::{normalize_symbols, parse_symbols};
pub use error::PortfolioError;
pub use manager::PerformanceService;
pub use report::{PerformanceReport, SymbolFailure};
