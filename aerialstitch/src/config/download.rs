//! Download configuration.

use super::defaults::{DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_PARALLEL_DOWNLOADS};
use super::settings::DownloadSettings;

/// Configuration for tile fetching.
///
/// Groups the parameters needed to build a provider stack and fetch limiter.
///
/// # Example
///
/// ```
/// use aerialstitch::config::DownloadConfig;
///
/// let config = DownloadConfig::default();
/// assert_eq!(config.timeout_secs(), 30);
/// assert_eq!(config.max_retries(), 3);
/// assert_eq!(config.max_concurrent(), 16);
///
/// let config = DownloadConfig::new()
///     .with_timeout_secs(60)
///     .with_max_retries(5)
///     .with_max_concurrent(8);
/// assert_eq!(config.max_concurrent(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    /// HTTP request timeout (in seconds)
    timeout_secs: u64,
    /// Retry attempts per tile after a network failure
    max_retries: u32,
    /// Maximum number of concurrent tile requests
    max_concurrent: usize,
}

impl DownloadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP request timeout in seconds. Default: 30 seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Set the number of retries after a transient failure. Default: 3.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the maximum number of concurrent requests. Default: 16.
    ///
    /// Zero is raised to one.
    pub fn with_max_concurrent(mut self, concurrent: usize) -> Self {
        self.max_concurrent = concurrent.max(1);
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            max_concurrent: DEFAULT_PARALLEL_DOWNLOADS,
        }
    }
}

impl From<&DownloadSettings> for DownloadConfig {
    fn from(settings: &DownloadSettings) -> Self {
        Self::new()
            .with_timeout_secs(settings.timeout)
            .with_max_retries(settings.max_retries)
            .with_max_concurrent(settings.max_concurrent)
    }
}
