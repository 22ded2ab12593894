use analytics::RiskMetrics;
use anyhow::Context;
use api_client::{InMemoryProvider, PriceProvider, RetryingProvider, YahooClient};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{init_tracing, load_config_from, Config, FailurePolicy};
use core_types::ClosePoint;
use portfolio_backtester::{parse_symbols, PerformanceReport, PerformanceService};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The main entry point for the Trendfolio application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env file with TRENDFOLIO_* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = load_config_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(policy) = cli.on_failure {
        config.batch.on_failure = policy;
    }
    let _log_guard = init_tracing(&config.logging)?;

    let provider = build_provider(cli.offline_csv.as_deref(), &config)?;
    let mut service = PerformanceService::new(&config, provider)?;
    if let Some(as_of) = cli.as_of {
        service = service.as_of(as_of);
    }

    match cli.command {
        Commands::Performance(args) => {
            let symbols = parse_symbols(&args.symbols)?;
            let report = service.compute_performance(&symbols).await?;
            if args.json {
                print_json(&report)?;
            } else {
                print_performance(&report);
            }
        }
        Commands::Closes(args) => {
            let symbols = parse_symbols(&args.symbols)?;
            let closes = service.compute_close_series(&symbols).await?;
            if args.json {
                print_json(&closes)?;
            } else {
                print_closes(&closes);
            }
        }
        Commands::Metrics(args) => {
            let symbols = parse_symbols(&args.symbols)?;
            let metrics = service.compute_risk_metrics(&symbols).await?;
            if args.json {
                print_json(&metrics)?;
            } else {
                print_metrics(&metrics);
            }
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Moving-average crossover backtests over daily closes, per symbol and combined.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Serve prices from a `symbol,date,close` CSV file instead of Yahoo Finance.
    #[arg(long, global = true)]
    offline_csv: Option<PathBuf>,

    /// What to do when one symbol's provider call fails. Overrides the config file.
    #[arg(long, global = true, value_enum)]
    on_failure: Option<FailurePolicy>,

    /// End the lookback window at this date (YYYY-MM-DD) instead of today.
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// The combined holdings, cash and total of every symbol, per date.
    Performance(SymbolArgs),
    /// The raw daily closes of every symbol.
    Closes(SymbolArgs),
    /// Volatility, Sharpe ratio and drawdown per symbol.
    Metrics(SymbolArgs),
}

#[derive(Parser)]
struct SymbolArgs {
    /// Comma-separated ticker symbols (e.g., "AAPL,MSFT").
    #[arg(long)]
    symbols: String,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Wiring
// ==============================================================================

fn build_provider(offline_csv: Option<&Path>, config: &Config) -> anyhow::Result<Arc<dyn PriceProvider>> {
    if let Some(path) = offline_csv {
        let provider = InMemoryProvider::from_csv_path(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        tracing::info!(path = %path.display(), "Using offline price file");
        return Ok(Arc::new(provider));
    }

    let client = YahooClient::new(&config.provider)?;
    if config.provider.max_retries == 0 {
        return Ok(Arc::new(client));
    }
    Ok(Arc::new(RetryingProvider::new(
        client,
        config.provider.max_retries,
        config.provider.retry_backoff(),
    )))
}

// ==============================================================================
// Output
// ==============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn print_performance(report: &PerformanceReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Holdings", "Cash", "Total"]);
    for point in &report.series {
        table.add_row(vec![
            point.date.to_string(),
            fmt_value(point.holdings, 2),
            fmt_value(point.cash, 2),
            fmt_value(point.total, 2),
        ]);
    }
    println!("{table}");

    if !report.skipped.is_empty() {
        println!("No data: {}", report.skipped.join(", "));
    }
    for failure in &report.failures {
        println!("Failed: {} ({})", failure.symbol, failure.reason);
    }
}

fn print_closes(closes: &[ClosePoint]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Symbol", "Date", "Close"]);
    for point in closes {
        table.add_row(vec![
            point.symbol.clone(),
            point.date.to_string(),
            format!("{:.4}", point.close),
        ]);
    }
    println!("{table}");
}

fn print_metrics(metrics: &[RiskMetrics]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Symbol",
        "Days",
        "Volatility",
        "Sharpe",
        "Recent Vol",
        "Final Total",
        "Return %",
        "Max DD %",
    ]);
    for m in metrics {
        table.add_row(vec![
            m.symbol.clone(),
            m.observations.to_string(),
            fmt_value(m.volatility, 4),
            fmt_value(m.sharpe, 3),
            fmt_value(m.recent_volatility, 4),
            fmt_value(m.final_total, 2),
            fmt_value(m.total_return_pct, 2),
            fmt_value(m.max_drawdown_pct, 2),
        ]);
    }
    println!("{table}");
}
