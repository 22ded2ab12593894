//! Yahoo Finance chart API client

use crate::error::ApiError;
use crate::responses::{ChartResponse, ChartResult};
use crate::{normalize_series, PriceProvider};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use configuration::ProviderConfig;
use core_types::PricePoint;
use reqwest::StatusCode;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; trendfolio/0.1)";

/// A `PriceProvider` backed by Yahoo's public `v8/finance/chart` endpoint.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    /// Builds a client whose every request is bounded by `provider.request_timeout()`.
    pub fn new(provider: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(provider.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = midnight_timestamp(start);
        let period2 = midnight_timestamp(end);

        tracing::debug!(symbol, %start, %end, "Requesting daily chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        // Yahoo answers unknown symbols with a 404 carrying a well-formed chart error.
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(symbol, "Provider has no chart for symbol");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                symbol: symbol.to_string(),
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        let chart: ChartResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(format!("chart for {}: {}", symbol, e)))?;
        parse_chart(symbol, chart)
    }
}

/// Seconds since the epoch at 00:00 UTC on `date`.
fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Converts a chart envelope into an ordered close series.
pub(crate) fn parse_chart(symbol: &str, response: ChartResponse) -> Result<Vec<PricePoint>, ApiError> {
    if let Some(error) = response.chart.error {
        if error.is_not_found() {
            return Ok(Vec::new());
        }
        return Err(ApiError::InvalidData(format!(
            "chart for {}: {} ({})",
            symbol,
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    series_from_result(symbol, result)
}

fn series_from_result(symbol: &str, result: ChartResult) -> Result<Vec<PricePoint>, ApiError> {
    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    // Prefer split/dividend adjusted closes; fall back to the raw close column.
    let closes = result
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .and_then(|a| a.adjclose)
        .or_else(|| {
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .and_then(|q| q.close)
        })
        .unwrap_or_default();

    if closes.len() != timestamps.len() {
        return Err(ApiError::InvalidData(format!(
            "chart for {}: {} timestamps but {} closes",
            symbol,
            timestamps.len(),
            closes.len()
        )));
    }

    let offset = result.meta.gmtoffset;
    let points = timestamps
        .into_iter()
        .zip(closes)
        .map(|(ts, close)| {
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", ts)))?
                .date_naive();
            Ok(PricePoint {
                date,
                close: close.filter(|c| c.is_finite()),
            })
        })
        .collect::<Result<Vec<PricePoint>, ApiError>>()?;

    Ok(normalize_series(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<PricePoint>, ApiError> {
        parse_chart("TEST", serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_chart_prefers_adjusted_close_and_keeps_gaps() {
        // 2024-01-02 and 2024-01-03 14:30 UTC (09:30 New York).
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"TEST","gmtoffset":-18000,"currency":"USD"},
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{
                "quote":[{"close":[185.6,184.2,null]}],
                "adjclose":[{"adjclose":[184.9,183.5,null]}]
            }}],"error":null}}"#;

        let points = parse(json).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[0].close, Some(184.9));
        assert_eq!(points[1].close, Some(183.5));
        assert_eq!(points[2].close, None);
    }

    #[test]
    fn test_parse_chart_falls_back_to_raw_close() {
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"TEST","gmtoffset":0},
            "timestamp":[1704205800],
            "indicators":{"quote":[{"close":[185.6]}]}}],"error":null}}"#;

        let points = parse(json).unwrap();
        assert_eq!(points[0].close, Some(185.6));
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chart_empty_range_is_empty() {
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"TEST","gmtoffset":0},
            "indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chart_rejects_ragged_columns() {
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"TEST","gmtoffset":0},
            "timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{"close":[185.6]}]}}],"error":null}}"#;
        assert!(matches!(parse(json), Err(ApiError::InvalidData(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_daily_closes_live() {
        let client = YahooClient::new(&ProviderConfig::default()).unwrap();
        let window = crate::LookbackWindow::ending_today(3).unwrap();
        let points = client
            .fetch_daily_closes("AAPL", window.start, window.end)
            .await
            .unwrap();
        assert!(!points.is_empty());
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }
}
