use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    BatchConfig, Config, CrossoverParams, FailurePolicy, LoggingConfig, ProviderConfig,
    SimulationParams,
};

/// Prefix for environment overrides, e.g. `TRENDFOLIO_STRATEGY__SHORT_WINDOW=20`.
pub const ENV_PREFIX: &str = "TRENDFOLIO";

/// Loads the configuration in three layers: built-in defaults, then the TOML file at
/// `path` (optional; a missing file is not an error), then `TRENDFOLIO_*` environment
/// variables. The merged result is validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, path = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.strategy.short_window, 25);
        assert_eq!(config.strategy.long_window, 50);
        assert_eq!(config.simulation.unit_size, 1000.0);
        assert_eq!(config.simulation.starting_cash, 10000.0);
        assert_eq!(config.provider.lookback_months, 18);
        assert_eq!(config.batch.on_failure, FailurePolicy::Skip);
    }

    #[test]
    fn test_file_overrides_only_named_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[strategy]\nshort_window = 5\nlong_window = 10\n\n[batch]\non_failure = \"abort\""
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.strategy, CrossoverParams { short_window: 5, long_window: 10 });
        assert_eq!(config.batch.on_failure, FailurePolicy::Abort);
        assert_eq!(config.simulation, SimulationParams::default());
    }

    #[test]
    fn test_inverted_windows_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[strategy]\nshort_window = 50\nlong_window = 25").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_overrides_file_with_single_underscore_prefix() {
        // No other test reads `provider.max_retries`, so the variable cannot leak into them.
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[provider]\nmax_retries = 1").unwrap();

        // SAFETY: the variable is unique to this test and removed before it returns.
        unsafe { std::env::set_var("TRENDFOLIO_PROVIDER__MAX_RETRIES", "4") };
        let result = load_config_from(file.path());
        unsafe { std::env::remove_var("TRENDFOLIO_PROVIDER__MAX_RETRIES") };

        assert_eq!(result.unwrap().provider.max_retries, 4);
    }

    #[test]
    fn test_validate_rejects_non_positive_unit_size() {
        let mut config = Config::default();
        config.simulation.unit_size = 0.0;
        assert!(config.validate().is_err());
    }
}
