use api_client::InMemoryProvider;
use chrono::{Duration, NaiveDate};
use configuration::Config;
use core_types::PricePoint;
use portfolio_backtester::{parse_symbols, PerformanceService};
use std::sync::Arc;

const TOLERANCE: f64 = 1e-9;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn series(closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| PricePoint::new(start + Duration::days(i as i64), *c))
        .collect()
}

/// `[100] * 24` followed by 100, 101, 102, ... for 60 rows in total.
fn rising_after_flat() -> Vec<f64> {
    (0..60)
        .map(|i| if i < 24 { 100.0 } else { 100.0 + (i - 24) as f64 })
        .collect()
}

fn wavy(len: usize, base: f64) -> Vec<f64> {
    (0..len)
        .map(|i| base + 10.0 * ((i as f64) / 7.0).sin())
        .collect()
}

fn service(provider: InMemoryProvider) -> PerformanceService {
    PerformanceService::new(&Config::default(), Arc::new(provider))
        .unwrap()
        .as_of(as_of())
}

#[tokio::test]
async fn test_end_to_end_rising_series() {
    let closes = rising_after_flat();
    let provider = InMemoryProvider::new().with_series("RISE", series(&closes));

    let report = service(provider).compute_performance(&["RISE"]).await.unwrap();
    let points = report.series;
    assert_eq!(points.len(), 60);

    for point in &points[..=24] {
        assert_eq!(point.total, Some(10000.0));
        assert_eq!(point.holdings, Some(0.0));
    }

    // The 50-row mean only exists from row 49, where the position opens.
    assert_eq!(points[48].holdings, Some(0.0));
    for i in 49..60 {
        let holdings = points[i].holdings.unwrap();
        assert!((holdings - 1000.0 * closes[i]).abs() < TOLERANCE);
    }
    for i in 50..60 {
        let step = points[i].total.unwrap() - points[i - 1].total.unwrap();
        assert!((step - 1000.0 * (closes[i] - closes[i - 1])).abs() < TOLERANCE);
    }
}

#[tokio::test]
async fn test_short_history_stays_at_starting_cash() {
    let provider = InMemoryProvider::new().with_series("SHORT", series(&wavy(24, 50.0)));

    let report = service(provider).compute_performance(&["SHORT"]).await.unwrap();
    assert_eq!(report.series.len(), 24);
    assert!(report.series.iter().all(|p| p.total == Some(10000.0)));
}

#[tokio::test]
async fn test_symbol_order_does_not_change_series() {
    let provider = InMemoryProvider::new()
        .with_series("AAA", series(&wavy(120, 80.0)))
        .with_series("BBB", series(&rising_after_flat()));
    let service = service(provider);

    let forward = service.compute_performance(&["AAA", "BBB"]).await.unwrap();
    let reverse = service.compute_performance(&["BBB", "AAA"]).await.unwrap();
    assert_eq!(forward.series, reverse.series);
}

#[tokio::test]
async fn test_symbol_without_data_is_skipped() {
    let provider = InMemoryProvider::new().with_series("VALIDTICKER", series(&wavy(90, 30.0)));
    let service = service(provider);

    let alone = service.compute_performance(&["VALIDTICKER"]).await.unwrap();
    let with_missing = service
        .compute_performance(&["VALIDTICKER", "ZZZNODATA"])
        .await
        .unwrap();

    assert_eq!(alone.series, with_missing.series);
    assert_eq!(with_missing.skipped, vec!["ZZZNODATA".to_string()]);
    assert!(with_missing.failures.is_empty());
}

#[tokio::test]
async fn test_all_symbols_empty_is_an_empty_success() {
    let report = service(InMemoryProvider::new())
        .compute_performance(&["NOPE", "NADA"])
        .await
        .unwrap();
    assert!(report.series.is_empty());
    assert_eq!(report.skipped.len(), 2);
}

#[tokio::test]
async fn test_query_string_feeds_the_service() {
    let provider = InMemoryProvider::new().with_series("AAPL", series(&[190.0, 191.5]));
    let symbols = parse_symbols(" aapl ,, AAPL").unwrap();

    let closes = service(provider).compute_close_series(&symbols).await.unwrap();
    assert_eq!(closes.len(), 2);
    assert_eq!(closes[1].close, 191.5);

    let json = serde_json::to_value(&closes[0]).unwrap();
    assert_eq!(json["date"], "2024-01-01");
    assert_eq!(json["symbol"], "AAPL");
}

#[tokio::test]
async fn test_report_serializes_dates_and_nulls() {
    let provider = InMemoryProvider::new().with_series("AAA", series(&[10.0, 11.0]));
    let report = service(provider).compute_performance(&["AAA"]).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["series"][0]["date"], "2024-01-01");
    assert_eq!(json["series"][0]["total"], 10000.0);
    assert!(json["skipped"].as_array().unwrap().is_empty());
}
