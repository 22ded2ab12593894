use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider failure for {symbol}: {source}")]
    ProviderFailure {
        symbol: String,
        source: api_client::error::ApiError,
    },

    #[error("Simulation failed for {symbol}: {source}")]
    Simulation {
        symbol: String,
        source: backtester::error::BacktestError,
    },

    #[error("Strategy configuration error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Could not determine the lookback window: {0}")]
    Window(#[source] api_client::error::ApiError),
}
