use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use core_types::PricePoint;

pub mod error;
pub mod memory;
pub mod responses;
pub mod retry;
pub mod yahoo;

// --- Public API ---
pub use memory::InMemoryProvider;
pub use retry::RetryingProvider;
pub use yahoo::YahooClient;

/// The abstract interface for a daily price-history source.
///
/// This trait is the contract the pipeline loads data through, allowing the
/// underlying implementation (live, retrying, or in-memory) to be swapped out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the daily closes for `symbol` with `start <= date < end`.
    ///
    /// Returns `Ok(vec![])` when the provider simply has no data for the symbol or
    /// range. `Err` is reserved for transport and parse failures. The result is
    /// ordered ascending by date with no duplicate dates.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, ApiError>;
}

/// The `[start, end)` date range requested for every symbol of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LookbackWindow {
    /// The window of `months` calendar months ending at `end`.
    ///
    /// Month arithmetic clamps to the last valid day, so 31 August minus six months
    /// is 28 (or 29) February.
    pub fn ending(end: NaiveDate, months: u32) -> Result<Self, ApiError> {
        let start = end.checked_sub_months(Months::new(months)).ok_or_else(|| {
            ApiError::InvalidData(format!("cannot step {} months back from {}", months, end))
        })?;
        Ok(Self { start, end })
    }

    /// The window ending at today's local date.
    pub fn ending_today(months: u32) -> Result<Self, ApiError> {
        Self::ending(chrono::Local::now().date_naive(), months)
    }
}

/// Sorts a provider series by date and collapses duplicate dates, keeping the
/// last reported value for each.
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    // Stable sort keeps provider order among equal dates, so "last" is well defined.
    points.sort_by_key(|p| p.date);
    let mut normalized: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match normalized.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => normalized.push(point),
        }
    }
    normalized
}
