use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty (or absent) `config.toml` yields the
/// reference strategy: 25/50 crossover, 1000 shares, 10000 starting cash, 18 months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strategy: CrossoverParams,
    pub simulation: SimulationParams,
    pub provider: ProviderConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects parameter combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        self.simulation.validate()?;
        if self.provider.lookback_months == 0 {
            return Err(ConfigError::ValidationError(
                "provider.lookback_months must be at least 1".to_string(),
            ));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for the two-window moving average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_window: 25,
            long_window: 50,
        }
    }
}

impl CrossoverParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(ConfigError::ValidationError(
                "strategy windows must be greater than zero".to_string(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(ConfigError::ValidationError(format!(
                "strategy.short_window ({}) must be less than strategy.long_window ({})",
                self.short_window, self.long_window
            )));
        }
        Ok(())
    }
}

/// Parameters for the cash/holdings bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Shares held while the signal is long.
    pub unit_size: f64,
    /// Cash available before the first trade.
    pub starting_cash: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            unit_size: 1000.0,
            starting_cash: 10000.0,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.unit_size.is_finite() && self.unit_size > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.unit_size must be a positive number, got {}",
                self.unit_size
            )));
        }
        if !self.starting_cash.is_finite() {
            return Err(ConfigError::ValidationError(
                "simulation.starting_cash must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Root of the Yahoo Finance chart API.
    pub base_url: String,
    /// Calendar months of history requested, ending today.
    pub lookback_months: u32,
    pub request_timeout_secs: u64,
    /// Extra attempts after the first failed request. 0 disables retries.
    pub max_retries: u32,
    /// Initial backoff, doubled on every further retry.
    pub retry_backoff_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            lookback_months: 18,
            request_timeout_secs: 10,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// What a multi-symbol request does when one symbol's provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FailurePolicy {
    /// Drop the failing symbol, report it, and keep the rest of the batch.
    #[default]
    Skip,
    /// Fail the whole request on the first provider failure.
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. "info" or "portfolio_backtester=debug".
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
