use crate::error::ApiError;
use crate::PriceProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PricePoint;
use std::time::Duration;

/// Wraps a provider with bounded retries on transient failures.
///
/// The delay before retry `n` (1-based) is `backoff * 2^(n-1)`. Successful
/// responses, including empty ones, pass through untouched.
#[derive(Debug, Clone)]
pub struct RetryingProvider<P> {
    inner: P,
    max_retries: u32,
    backoff: Duration,
}

impl<P: PriceProvider> RetryingProvider<P> {
    pub fn new(inner: P, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
        }
    }
}

#[async_trait]
impl<P: PriceProvider> PriceProvider for RetryingProvider<P> {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, ApiError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch_daily_closes(symbol, start, end).await {
                Ok(points) => return Ok(points),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    tracing::warn!(
                        symbol,
                        attempt,
                        max_retries = self.max_retries,
                        ?delay,
                        error = %e,
                        "Provider request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockPriceProvider;
    use mockall::Sequence;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn server_error() -> ApiError {
        ApiError::Http {
            symbol: "AAPL".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failure_then_succeeds() {
        let mut mock = MockPriceProvider::new();
        let mut seq = Sequence::new();
        mock.expect_fetch_daily_closes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(server_error()));
        mock.expect_fetch_daily_closes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(vec![PricePoint::new(date(3), 190.0)]));

        let provider = RetryingProvider::new(mock, 2, Duration::from_millis(1));
        let points = provider
            .fetch_daily_closes("AAPL", date(1), date(10))
            .await
            .unwrap();
        assert_eq!(points, vec![PricePoint::new(date(3), 190.0)]);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mut mock = MockPriceProvider::new();
        mock.expect_fetch_daily_closes()
            .times(3)
            .returning(|_, _, _| Err(server_error()));

        let provider = RetryingProvider::new(mock, 2, Duration::from_millis(1));
        let err = provider
            .fetch_daily_closes("AAPL", date(1), date(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_failure() {
        let mut mock = MockPriceProvider::new();
        mock.expect_fetch_daily_closes()
            .times(1)
            .returning(|_, _, _| Err(ApiError::InvalidData("bad payload".to_string())));

        let provider = RetryingProvider::new(mock, 5, Duration::from_millis(1));
        let result = provider.fetch_daily_closes("AAPL", date(1), date(10)).await;
        assert!(matches!(result, Err(ApiError::InvalidData(_))));
    }
}
