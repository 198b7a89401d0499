//! Semaphore-based cap on concurrent tile requests.
//!
//! ```ignore
//! use std::sync::Arc;
//! use aerialstitch::fetch::FetchLimiter;
//!
//! let limiter = Arc::new(FetchLimiter::new(16));
//! let _permit = limiter.acquire().await?;
//! // request runs while the permit is held
//! ```

use super::FetchError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of concurrent tile requests.
pub const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Limiter for concurrent tile requests.
///
/// Tracks the current and peak number of held permits so the mosaic can
/// report how hard it drove the provider.
#[derive(Debug)]
pub struct FetchLimiter {
    semaphore: Arc<Semaphore>,
    max_permits: usize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: AtomicUsize,
}

impl FetchLimiter {
    /// Creates a limiter allowing `max_concurrent` requests at once.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Waits for a permit.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Internal` if the semaphore was closed.
    pub async fn acquire(&self) -> Result<FetchPermit, FetchError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| FetchError::Internal(format!("fetch limiter closed: {}", e)))?;

        Ok(self.track(permit))
    }

    /// Takes a permit if one is free, without waiting.
    pub fn try_acquire(&self) -> Option<FetchPermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(self.track(permit))
    }

    fn track(&self, permit: OwnedSemaphorePermit) -> FetchPermit {
        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);

        FetchPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of permits held at once since creation or the last reset.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn reset_peak(&self) {
        self.peak_in_flight.store(0, Ordering::Relaxed);
    }
}

impl Default for FetchLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// A held request slot. Released on drop.
///
/// Owns its bookkeeping so it can move into a spawned task.
#[derive(Debug)]
pub struct FetchPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for FetchPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
