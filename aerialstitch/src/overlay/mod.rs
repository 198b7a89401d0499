//! Overlay rendering and compositing.
//!
//! A [`VectorLayerRenderer`] produces a map layer raster for the mosaic's
//! bounding box. [`merge_or`] resamples it to the aerial raster's size and
//! merges the two with a per-channel bitwise OR, so white strokes on black
//! show up over the imagery and black areas leave it untouched.

mod composite;
mod layer;
mod polyline;

pub use composite::{downscale, downscaled_size, merge_or, resample, ResampleFilter};
pub use layer::{BlankLayer, RasterFileLayer, RenderError, VectorLayerRenderer};
pub use polyline::{PolylineLayer, DEFAULT_STROKE_WIDTH};
