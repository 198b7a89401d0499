//! Configuration for aerialstitch.
//!
//! User settings live in `~/.aerialstitch/config.ini`; a missing file means
//! defaults. [`DownloadConfig`] carries the fetch parameters into the
//! provider stack.
//!
//! ```
//! use aerialstitch::config::{ConfigFile, DownloadConfig};
//!
//! let config = ConfigFile::default();
//! let download = DownloadConfig::from(&config.download);
//! assert_eq!(download.max_concurrent(), 16);
//! ```

mod defaults;
mod download;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use download::DownloadConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, DownloadSettings, LoggingSettings, OutputSettings, ProviderSettings};
