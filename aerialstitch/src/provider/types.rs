//! Provider types and traits

use crate::coord::QuadKey;
use std::fmt;
use std::future::Future;

/// Errors that can occur while fetching a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider has no imagery for the requested tile
    NotFound(String),
    /// Transport failure (connect, timeout, truncated body)
    NetworkFailure(String),
    /// Provider answered with an error status or refused the request
    ProviderSpecific(String),
    /// Response could not be interpreted
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns true for failures worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::NetworkFailure(_))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound(what) => write!(f, "Tile not found: {}", what),
            ProviderError::NetworkFailure(msg) => write!(f, "Network failure: {}", msg),
            ProviderError::ProviderSpecific(msg) => write!(f, "Provider error: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Async source of 256×256 tile rasters addressed by quadkey.
///
/// Implementors own transport, authentication and retry policy. The mosaic
/// core only sees encoded image bytes or a typed error.
pub trait TileProvider: Send + Sync {
    /// Fetches the encoded raster for one tile.
    ///
    /// # Returns
    ///
    /// Raw image data (typically JPEG or PNG) or an error.
    fn fetch(&self, quadkey: &QuadKey)
        -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
