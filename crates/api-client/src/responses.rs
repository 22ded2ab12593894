use serde::Deserialize;

/// The envelope of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Yahoo's error object, e.g. `{"code": "Not Found", "description": "No data found, symbol may be delisted"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartError {
    /// The symbol is unknown or has no history; callers treat this as an empty series.
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Absent when the requested range holds no trading days.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    /// Seconds east of UTC for the listing exchange. Bar timestamps are the session
    /// open in UTC, so the offset is needed to recover the exchange-local date.
    #[serde(default)]
    pub gmtoffset: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Option<Vec<AdjCloseIndicator>>,
}

/// Columnar OHLC data; a `null` entry marks a gap for that bar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Option<Vec<Option<f64>>>,
}
