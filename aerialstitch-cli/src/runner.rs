//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and provider creation
//! so command handlers only deal with their own arguments.

use crate::error::CliError;
use aerialstitch::config::{ConfigFile, DownloadConfig};
use aerialstitch::logging::{init_logging, LoggingGuard};
use aerialstitch::provider::{AsyncReqwestClient, HttpTileProvider, RetryingProvider};
use tracing::info;

/// Provider stack used by the CLI: HTTP template source wrapped in retries.
pub type CliProvider = RetryingProvider<HttpTileProvider<AsyncReqwestClient>>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.file, true, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("aerialstitch v{}", aerialstitch::VERSION);
        info!(
            log_file = %self.logging_guard.log_path().display(),
            "aerialstitch CLI: {} command", command
        );
    }

    /// Create the tile provider from download settings and a URL template.
    pub fn create_provider(
        &self,
        download: &DownloadConfig,
        url_template: &str,
    ) -> Result<CliProvider, CliError> {
        let client = AsyncReqwestClient::with_timeout(download.timeout_secs())?;
        let source = HttpTileProvider::with_url_template(client, url_template)?;

        info!(
            url_template,
            timeout_secs = download.timeout_secs(),
            max_retries = download.max_retries(),
            "Tile provider created"
        );

        Ok(RetryingProvider::new(source, download.max_retries()))
    }
}
