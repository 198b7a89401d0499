//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use aerialstitch::config::ConfigFileError;
use aerialstitch::coord::CoordError;
use aerialstitch::grid::GridError;
use aerialstitch::mosaic::MosaicError;
use aerialstitch::overlay::RenderError;
use aerialstitch::provider::ProviderError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Bad command-line value
    InvalidArgument(String),
    /// Failed to build the tile provider
    Provider(ProviderError),
    /// Failed to load the overlay layer
    Overlay(RenderError),
    /// Coordinate conversion failed
    Coord(CoordError),
    /// Bounding box could not be planned
    Grid(GridError),
    /// Mosaic pipeline failed
    Mosaic(MosaicError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Mosaic(MosaicError::TileUnavailable { .. }) | CliError::Provider(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. No network connection to the tile server");
                eprintln!("  2. The provider has no imagery at this zoom level; try a lower --zoom");
                eprintln!("  3. A custom --url-template points at the wrong server");
            }
            CliError::Grid(_) => {
                eprintln!();
                eprintln!("The bounding box needs north > south and east > west,");
                eprintln!("and must span at least one pixel at the chosen zoom.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or delete it to restore defaults.",
                    aerialstitch::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Provider(e) => write!(f, "Failed to create tile provider: {}", e),
            CliError::Overlay(e) => write!(f, "Failed to load overlay: {}", e),
            CliError::Coord(e) => write!(f, "{}", e),
            CliError::Grid(e) => write!(f, "Invalid bounding box: {}", e),
            CliError::Mosaic(e) => write!(f, "Mosaic failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Provider(e) => Some(e),
            CliError::Overlay(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::Grid(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Overlay(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        match e {
            MosaicError::Grid(e) => CliError::Grid(e),
            other => CliError::Mosaic(other),
        }
    }
}
