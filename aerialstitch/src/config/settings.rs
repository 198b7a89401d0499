//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use crate::overlay::ResampleFilter;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub download: DownloadSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Tile source.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// URL with a `{quadkey}` placeholder
    pub url_template: String,
}

/// Fetch behaviour.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Maximum concurrent tile requests
    pub max_concurrent: usize,
    /// Retries per tile for transient network failures
    pub max_retries: u32,
    /// HTTP request timeout in seconds
    pub timeout: u64,
}

/// Output raster defaults.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Shrink applied to the aerial raster before merging (1 = none)
    pub shrink_factor: u32,
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
