use core_types::AggregatedPoint;
use serde::Serialize;

/// A symbol dropped from a batch run under `FailurePolicy::Skip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// The combined outcome of a multi-symbol performance run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Summed holdings, cash and total per date, ascending.
    pub series: Vec<AggregatedPoint>,
    /// Symbols for which the provider returned no data.
    pub skipped: Vec<String>,
    pub failures: Vec<SymbolFailure>,
}

impl PerformanceReport {
    /// True when every requested symbol contributed to `series`.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}
