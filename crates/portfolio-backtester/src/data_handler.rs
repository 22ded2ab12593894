use crate::error::PortfolioError;
use api_client::{LookbackWindow, PriceProvider};
use core_types::PricePoint;
use futures::future::join_all;
use std::collections::HashSet;

/// What became of one symbol of a batch.
#[derive(Debug)]
pub enum SymbolOutcome<T> {
    /// The provider returned closes and `process` succeeded on them.
    Loaded(T),
    /// The provider had no usable closes for the window. Not an error.
    Empty,
    Failed(PortfolioError),
}

/// Parses a comma-separated symbol query such as `"aapl, MSFT,,aapl"`.
pub fn parse_symbols(query: &str) -> Result<Vec<String>, PortfolioError> {
    normalize_symbols(query.split(','))
}

/// Trims, upper-cases and de-duplicates symbols, keeping first-seen order.
///
/// Blank entries are dropped. An input with nothing left is rejected, so no
/// provider call is ever made for an empty batch.
pub fn normalize_symbols<I, S>(symbols: I) -> Result<Vec<String>, PortfolioError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let normalized: Vec<String> = symbols
        .into_iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect();

    if normalized.is_empty() {
        return Err(PortfolioError::InvalidInput(
            "at least one non-blank symbol is required".to_string(),
        ));
    }
    Ok(normalized)
}

fn has_closes(points: &[PricePoint]) -> bool {
    points
        .iter()
        .any(|p| p.close.is_some_and(|c| c.is_finite()))
}

/// Fetches every symbol over the same `window` concurrently and runs `process`
/// on each non-empty series as part of that symbol's future.
///
/// Outcomes come back in the order of `symbols`, whatever order the fetches
/// complete in.
pub async fn load_each<T, F>(
    provider: &dyn PriceProvider,
    symbols: &[String],
    window: LookbackWindow,
    process: F,
) -> Vec<(String, SymbolOutcome<T>)>
where
    F: Fn(&str, Vec<PricePoint>) -> Result<T, PortfolioError>,
{
    let process = &process;
    let tasks = symbols.iter().map(|symbol| async move {
        let outcome = match provider
            .fetch_daily_closes(symbol, window.start, window.end)
            .await
        {
            Ok(points) if !has_closes(&points) => SymbolOutcome::Empty,
            Ok(points) => match process(symbol, points) {
                Ok(value) => SymbolOutcome::Loaded(value),
                Err(e) => SymbolOutcome::Failed(e),
            },
            Err(source) => SymbolOutcome::Failed(PortfolioError::ProviderFailure {
                symbol: symbol.clone(),
                source,
            }),
        };
        (symbol.clone(), outcome)
    });

    tracing::debug!(
        symbols = symbols.len(),
        start = %window.start,
        end = %window.end,
        "Fetching price series"
    );
    join_all(tasks).await
}
