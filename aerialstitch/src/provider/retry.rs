//! Retry decorator for tile providers

use super::types::{ProviderError, TileProvider};
use crate::coord::QuadKey;
use std::time::Duration;
use tracing::{debug, warn};

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Wraps a provider and retries transient failures with exponential backoff.
///
/// Only [`ProviderError::NetworkFailure`] is retried. A missing tile or a
/// refused request fails immediately.
pub struct RetryingProvider<P: TileProvider> {
    inner: P,
    max_retries: u32,
    initial_backoff: Duration,
}

impl<P: TileProvider> RetryingProvider<P> {
    pub fn new(inner: P, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Sets the delay before the first retry. Each further retry doubles it.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl<P: TileProvider> TileProvider for RetryingProvider<P> {
    async fn fetch(&self, quadkey: &QuadKey) -> Result<Vec<u8>, ProviderError> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            match self.inner.fetch(quadkey).await {
                Ok(data) => {
                    if attempt > 0 {
                        debug!(quadkey = %quadkey, attempt, "Tile fetched after retry");
                    }
                    return Ok(data);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        quadkey = %quadkey,
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given error a fixed number of times, then succeeds.
    struct FlakyProvider {
        failures: u32,
        error: ProviderError,
        calls: AtomicU32,
    }

    impl FlakyProvider {
        fn new(failures: u32, error: ProviderError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl TileProvider for FlakyProvider {
        async fn fetch(&self, _quadkey: &QuadKey) -> Result<Vec<u8>, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(vec![42])
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn key() -> QuadKey {
        "120".parse().unwrap()
    }

    fn network() -> ProviderError {
        ProviderError::NetworkFailure("connection reset".to_string())
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let provider = RetryingProvider::new(FlakyProvider::new(2, network()), 3)
            .with_initial_backoff(Duration::from_millis(1));

        assert_eq!(provider.fetch(&key()).await.unwrap(), vec![42]);
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let provider = RetryingProvider::new(FlakyProvider::new(10, network()), 2)
            .with_initial_backoff(Duration::from_millis(1));

        let result = provider.fetch(&key()).await;
        assert!(matches!(result, Err(ProviderError::NetworkFailure(_))));
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let provider = RetryingProvider::new(
            FlakyProvider::new(1, ProviderError::NotFound("120".to_string())),
            5,
        )
        .with_initial_backoff(Duration::from_millis(1));

        let result = provider.fetch(&key()).await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_name_delegates() {
        let provider = RetryingProvider::new(FlakyProvider::new(0, network()), 1);
        assert_eq!(provider.name(), "flaky");
        assert_eq!(provider.max_retries(), 1);
    }
}
