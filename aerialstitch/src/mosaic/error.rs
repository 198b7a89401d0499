//! Mosaic error types.

use crate::coord::{CoordError, TileCoord};
use crate::fetch::FetchError;
use crate::grid::GridError;
use crate::overlay::RenderError;
use crate::provider::ProviderError;
use crate::stitch::StitchError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a mosaic request.
///
/// None of these are retried; retrying transient network failures is the
/// provider's job.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// A tile could not be fetched
    #[error("tile {tile} unavailable: {source}")]
    TileUnavailable {
        tile: TileCoord,
        #[source]
        source: ProviderError,
    },

    /// A tile was fetched but is not a usable 256×256 raster
    #[error("invalid data for tile {tile}: {reason}")]
    InvalidTileData { tile: TileCoord, reason: String },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("overlay render failed: {0}")]
    Render(#[from] RenderError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output path has no writable raster format
    #[error("cannot write {path}: {reason}")]
    UnsupportedOutput { path: PathBuf, reason: String },

    #[error("mosaic cancelled")]
    Cancelled,

    /// Task failure or broken internal invariant
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for MosaicError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::TileUnavailable { tile, source } => Self::TileUnavailable { tile, source },
            FetchError::Cancelled => Self::Cancelled,
            FetchError::Coord(e) => Self::Coord(e),
            FetchError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<StitchError> for MosaicError {
    fn from(e: StitchError) -> Self {
        match e {
            StitchError::MissingTile(tile) => Self::TileUnavailable {
                tile,
                source: ProviderError::NotFound(format!("tile {} missing from fetched set", tile)),
            },
            StitchError::InvalidTileData { tile, reason } => Self::InvalidTileData { tile, reason },
        }
    }
}
