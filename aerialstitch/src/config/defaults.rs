//! Default values for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::fetch::DEFAULT_MAX_CONCURRENT;
use crate::overlay::ResampleFilter;
use crate::provider::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL_TEMPLATE};

pub const DEFAULT_PARALLEL_DOWNLOADS: usize = DEFAULT_MAX_CONCURRENT;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT_SECS;

/// Upper bound on concurrent tile requests accepted from config.
pub const MAX_PARALLEL_DOWNLOADS: usize = 256;

pub const DEFAULT_SHRINK_FACTOR: u32 = 1;
pub const DEFAULT_LOG_FILE_NAME: &str = "aerialstitch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                url_template: DEFAULT_URL_TEMPLATE.to_string(),
            },
            download: DownloadSettings {
                max_concurrent: DEFAULT_PARALLEL_DOWNLOADS,
                max_retries: DEFAULT_MAX_RETRIES,
                timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            },
            output: OutputSettings {
                shrink_factor: DEFAULT_SHRINK_FACTOR,
                filter: ResampleFilter::default(),
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
