use crate::error::ApiError;
use crate::{normalize_series, PriceProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PricePoint;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A `PriceProvider` that serves fixed series from memory.
///
/// Used for offline runs (`--offline-csv`) and as a deterministic test double.
/// Symbols it does not know resolve to an empty series, like an unknown ticker
/// on a live provider.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<PricePoint>>,
}

/// One row of an offline price file: `symbol,date,close`. An empty close is a gap.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    symbol: String,
    date: NaiveDate,
    close: Option<f64>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the series for `symbol`. Symbols are matched
    /// case-insensitively.
    pub fn with_series(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.series
            .insert(symbol.to_uppercase(), normalize_series(points));
        self
    }

    /// Loads a headered CSV file with `symbol,date,close` columns.
    pub fn from_csv_path(path: &Path) -> Result<Self, ApiError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut grouped: HashMap<String, Vec<PricePoint>> = HashMap::new();
        for record in reader.deserialize() {
            let record: PriceRecord = record?;
            grouped
                .entry(record.symbol.trim().to_uppercase())
                .or_default()
                .push(PricePoint {
                    date: record.date,
                    close: record.close,
                });
        }

        tracing::debug!(symbols = grouped.len(), path = %path.display(), "Loaded offline prices");

        Ok(Self {
            series: grouped
                .into_iter()
                .map(|(symbol, points)| (symbol, normalize_series(points)))
                .collect(),
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

#[async_trait]
impl PriceProvider for InMemoryProvider {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, ApiError> {
        Ok(self
            .series
            .get(&symbol.to_uppercase())
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date < end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}
