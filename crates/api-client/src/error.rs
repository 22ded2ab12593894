use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("The API request for {symbol} returned HTTP {status}: {message}")]
    Http {
        symbol: String,
        status: u16,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Failed to read price file: {0}")]
    PriceFile(#[from] csv::Error),
}

impl ApiError {
    /// Whether another attempt at the same request could plausibly succeed.
    ///
    /// Transport failures, rate limiting and server-side errors qualify; malformed
    /// payloads and client errors do not.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status == 429 || *status >= 500,
            ApiError::Deserialization(_) | ApiError::InvalidData(_) | ApiError::PriceFile(_) => false,
        }
    }
}
