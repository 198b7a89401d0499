//! Vector-layer renderers.

use super::composite::{resample, ResampleFilter};
use crate::coord::CoordError;
use crate::grid::BoundingBox;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from rendering an overlay layer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(String),

    /// Requested size cannot back a drawing surface
    #[error("cannot render {width}x{height} layer")]
    InvalidSize { width: u32, height: u32 },

    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Produces a raster of a map layer covering a bounding box.
///
/// The returned raster should be `size` pixels; the compositor resamples
/// anything else to the aerial raster's size.
pub trait VectorLayerRenderer: Send + Sync {
    fn render(&self, bbox: &BoundingBox, size: (u32, u32)) -> Result<RgbImage, RenderError>;
}

/// All-black layer. Merging it leaves the aerial raster unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLayer;

impl VectorLayerRenderer for BlankLayer {
    fn render(&self, _bbox: &BoundingBox, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        Ok(RgbImage::new(size.0, size.1))
    }
}

/// Pre-rendered map raster read from disk.
///
/// The file is assumed to already cover the requested bounding box; it is
/// only resized.
#[derive(Debug, Clone)]
pub struct RasterFileLayer {
    path: PathBuf,
    filter: ResampleFilter,
}

impl RasterFileLayer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filter: ResampleFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VectorLayerRenderer for RasterFileLayer {
    fn render(&self, _bbox: &BoundingBox, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        let bytes = std::fs::read(&self.path).map_err(|source| RenderError::Io {
            path: self.path.clone(),
            source,
        })?;
        let raster = image::load_from_memory(&bytes)?.to_rgb8();

        debug!(
            path = %self.path.display(),
            width = raster.width(),
            height = raster.height(),
            "Loaded overlay raster"
        );

        Ok(resample(&raster, size.0, size.1, self.filter))
    }
}
