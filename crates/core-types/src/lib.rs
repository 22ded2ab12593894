//! # Trendfolio Core Types
//!
//! Layer 0 of the workspace: the plain data structures that flow through the
//! pipeline (`PricePoint` -> `SignaledPoint` -> `PortfolioRow` -> `AggregatedPoint`).
//! Every other crate depends on this one; it depends on nothing internal.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Signal;
pub use error::CoreError;
pub use structs::{
    AggregatedPoint, ClosePoint, PortfolioRow, PricePoint, SignaledPoint, SymbolPortfolio,
};
