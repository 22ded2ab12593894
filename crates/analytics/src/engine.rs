use crate::report::{RiskMetrics, VolatilityPoint};
use chrono::NaiveDate;
use core_types::{PortfolioRow, SymbolPortfolio};

/// Periods used to annualise daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Window, in daily returns, behind `RiskMetrics::rolling_volatility`.
pub const ROLLING_VOLATILITY_WINDOW: usize = 21;

/// A stateless calculator for deriving risk metrics from a simulated run.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating risk metrics.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - A symbol's simulated rows; their closes feed the price
    ///   statistics and their totals feed the outcome statistics.
    pub fn calculate(&self, portfolio: &SymbolPortfolio) -> RiskMetrics {
        let mut report = RiskMetrics::empty(&portfolio.symbol);
        if portfolio.rows.is_empty() {
            return report;
        }

        let totals: Vec<f64> = portfolio.rows.iter().map(|r| r.total).collect();
        report.observations = portfolio.rows.len();

        let dated = daily_returns(&portfolio.rows);
        let returns: Vec<f64> = dated.iter().map(|(_, r)| *r).collect();
        report.volatility = annualized_volatility(&returns);
        report.sharpe = sharpe_ratio(&returns);
        report.rolling_volatility = rolling_volatility(&dated, ROLLING_VOLATILITY_WINDOW);
        report.recent_volatility = report.rolling_volatility.last().and_then(|p| p.volatility);

        self.calculate_outcome(&totals, &mut report);

        tracing::debug!(
            symbol = %portfolio.symbol,
            volatility = ?report.volatility,
            sharpe = ?report.sharpe,
            "Risk metrics calculated"
        );
        report
    }

    /// Final value, total return and maximum drawdown of the simulated total.
    fn calculate_outcome(&self, totals: &[f64], report: &mut RiskMetrics) {
        let (Some(&first), Some(&last)) = (totals.first(), totals.last()) else {
            return;
        };
        report.final_total = finite(last);
        if first != 0.0 {
            report.total_return_pct = finite((last / first - 1.0) * 100.0);
        }
        report.max_drawdown_pct = max_drawdown_pct(totals);
    }
}

/// Simple close-to-close returns, each dated by the later close. Non-finite
/// returns (a zero close) are dropped.
pub fn daily_returns(rows: &[PortfolioRow]) -> Vec<(NaiveDate, f64)> {
    rows.windows(2)
        .map(|w| (w[1].date, (w[1].close - w[0].close) / w[0].close))
        .filter(|(_, r)| r.is_finite())
        .collect()
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with Bessel's correction (n - 1).
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    finite(variance.sqrt())
}

fn annualized_volatility(returns: &[f64]) -> Option<f64> {
    sample_std_dev(returns).and_then(|s| finite(s * TRADING_DAYS_PER_YEAR.sqrt()))
}

/// For return `i`, the annualised volatility of returns `i - window .. i`. The
/// return of the day itself is not part of its window.
fn rolling_volatility(dated: &[(NaiveDate, f64)], window: usize) -> Vec<VolatilityPoint> {
    let returns: Vec<f64> = dated.iter().map(|(_, r)| *r).collect();
    dated
        .iter()
        .enumerate()
        .map(|(i, (date, _))| VolatilityPoint {
            date: *date,
            volatility: if i < window {
                None
            } else {
                annualized_volatility(&returns[i - window..i])
            },
        })
        .collect()
}

/// Mean over standard deviation, annualised. A zero-variance series scores 0.
fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    let std_dev = sample_std_dev(returns)?;
    if std_dev == 0.0 {
        return Some(0.0);
    }
    finite(mean(returns)? / std_dev * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Largest peak-to-trough decline, as a percentage of the peak.
fn max_drawdown_pct(totals: &[f64]) -> Option<f64> {
    let mut peak = *totals.first()?;
    let mut worst = 0.0_f64;
    for &total in totals {
        if total > peak {
            peak = total;
        }
        if peak > 0.0 {
            worst = worst.max((peak - total) / peak * 100.0);
        }
    }
    finite(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn portfolio(closes: &[f64], totals: &[f64]) -> SymbolPortfolio {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        SymbolPortfolio {
            symbol: "TEST".to_string(),
            rows: closes
                .iter()
                .zip(totals)
                .enumerate()
                .map(|(i, (close, total))| PortfolioRow {
                    date: start + Duration::days(i as i64),
                    close: *close,
                    position: 0.0,
                    holdings: 0.0,
                    cash: *total,
                    total: *total,
                    returns: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_portfolio_has_no_metrics() {
        let report = AnalyticsEngine::new().calculate(&portfolio(&[], &[]));
        assert_eq!(report, RiskMetrics::empty("TEST"));
    }

    #[test]
    fn test_constant_prices_have_zero_volatility_and_sharpe() {
        let report = AnalyticsEngine::new().calculate(&portfolio(&[10.0; 5], &[10000.0; 5]));
        assert_eq!(report.volatility, Some(0.0));
        assert_eq!(report.sharpe, Some(0.0));
        assert_eq!(report.total_return_pct, Some(0.0));
        assert_eq!(report.max_drawdown_pct, Some(0.0));
    }

    #[test]
    fn test_volatility_uses_sample_deviation() {
        // Returns: +10%, -10%. Sample std = sqrt(0.02) with mean 0.
        let closes = [100.0, 110.0, 99.0];
        let report = AnalyticsEngine::new().calculate(&portfolio(&closes, &[1.0; 3]));
        let expected = (0.02_f64).sqrt() * 252.0_f64.sqrt();
        assert!((report.volatility.unwrap() - expected).abs() < 1e-12);
        assert!(report.sharpe.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_single_return_leaves_risk_undefined() {
        let report = AnalyticsEngine::new().calculate(&portfolio(&[1.0, 2.0], &[1.0, 2.0]));
        assert_eq!(report.volatility, None);
        assert_eq!(report.sharpe, None);
        assert_eq!(report.total_return_pct, Some(100.0));
    }

    #[test]
    fn test_max_drawdown_tracks_running_peak() {
        let totals = [10000.0, 12000.0, 9000.0, 11000.0, 13000.0, 12350.0];
        let report = AnalyticsEngine::new().calculate(&portfolio(&[1.0; 6], &totals));
        assert!((report.max_drawdown_pct.unwrap() - 25.0).abs() < 1e-12);
        assert_eq!(report.final_total, Some(12350.0));
    }

    fn returns_with_shock(len: usize) -> Vec<(NaiveDate, f64)> {
        // Alternating +-1% with a single 50% jump on the final day.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..len)
            .map(|i| {
                let r = match i {
                    _ if i + 1 == len => 0.5,
                    _ if i % 2 == 0 => 0.01,
                    _ => -0.01,
                };
                (start + Duration::days(i as i64), r)
            })
            .collect()
    }

    #[test]
    fn test_rolling_volatility_excludes_the_current_return() {
        let dated = returns_with_shock(30);
        let returns: Vec<f64> = dated.iter().map(|(_, r)| *r).collect();
        let rolling = rolling_volatility(&dated, ROLLING_VOLATILITY_WINDOW);

        assert_eq!(rolling.len(), 30);
        assert!(rolling[..21].iter().all(|p| p.volatility.is_none()));
        assert_eq!(rolling[29].date, dated[29].0);

        let expected = sample_std_dev(&returns[8..29]).unwrap() * 252.0_f64.sqrt();
        let last = rolling[29].volatility.unwrap();
        assert!((last - expected).abs() < 1e-12);
        // The 50% shock on the last day is outside its own window.
        assert!(last < 0.5);
    }

    #[test]
    fn test_recent_volatility_is_last_rolling_value() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i % 3) as f64).collect();
        let report = AnalyticsEngine::new().calculate(&portfolio(&closes, &[1.0; 40]));

        assert_eq!(report.rolling_volatility.len(), 39);
        assert_eq!(
            report.recent_volatility,
            report.rolling_volatility.last().unwrap().volatility
        );
        assert!(report.recent_volatility.is_some());
    }

    #[test]
    fn test_short_series_has_no_recent_volatility() {
        let closes: Vec<f64> = (0..21).map(|i| 100.0 + i as f64).collect();
        let report = AnalyticsEngine::new().calculate(&portfolio(&closes, &[1.0; 21]));
        assert_eq!(report.rolling_volatility.len(), 20);
        assert_eq!(report.recent_volatility, None);
    }

    #[test]
    fn test_metrics_serialize_undefined_as_null() {
        let json = serde_json::to_value(RiskMetrics::empty("X")).unwrap();
        assert!(json["sharpe"].is_null());
    }
}
