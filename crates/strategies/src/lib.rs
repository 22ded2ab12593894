//! # Trendfolio Strategy Library
//!
//! This crate is the Signal Engine: it turns an ordered close series into a daily
//! long/flat signal.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of providers,
//!   networks, or portfolios. It depends only on `core-types` and `configuration`.
//! - **Stateless Evaluation:** `derive_signals` starts from fresh indicators on every
//!   call, so one strategy value can be shared across concurrent symbol tasks.
//!
//! ## Public API
//!
//! - `Strategy`: The trait the simulator pipeline drives.
//! - `SmaCrossover`: The two-window moving average crossover.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod ma_crossover;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use ma_crossover::SmaCrossover;

use core_types::{PricePoint, SignaledPoint};

/// The core trait for signal generation.
///
/// The `Send + Sync` bounds are required to allow one strategy to be shared by
/// the per-symbol tasks of a batch.
pub trait Strategy: Send + Sync {
    /// Derives one `SignaledPoint` per clean price point.
    ///
    /// # Arguments
    ///
    /// * `prices` - The symbol's series, ascending by date. Points without a close
    ///   are dropped before any indicator sees them.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SignaledPoint>)` - one row per retained price, in input order.
    /// * `Err(StrategyError)` - if an indicator cannot be constructed.
    fn derive_signals(&self, prices: &[PricePoint]) -> Result<Vec<SignaledPoint>, StrategyError>;
}
