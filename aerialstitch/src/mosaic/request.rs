//! Mosaic request parameters and result summary.

use crate::fetch::FetchStats;
use crate::grid::{BoundingBox, TileGrid};
use crate::overlay::ResampleFilter;
use std::path::PathBuf;

/// Parameters of one mosaic build.
///
/// # Example
///
/// ```
/// use aerialstitch::grid::BoundingBox;
/// use aerialstitch::mosaic::MosaicRequest;
///
/// let bbox = BoundingBox::new(42.062451, 42.049705, -87.668189, -87.686433).unwrap();
/// let request = MosaicRequest::new(bbox, 18, "campus.png")
///     .with_aerial_output("campus_aerial.png")
///     .with_shrink_factor(5);
/// assert_eq!(request.shrink_factor, 5);
/// ```
#[derive(Debug, Clone)]
pub struct MosaicRequest {
    pub bbox: BoundingBox,
    pub zoom: u8,
    /// Final composited raster; format chosen by extension
    pub output: PathBuf,
    /// Optional lossless copy of the aerial raster before merging
    pub aerial_output: Option<PathBuf>,
    /// Integer shrink applied to the aerial raster before merging (1 = none)
    pub shrink_factor: u32,
    pub filter: ResampleFilter,
}

impl MosaicRequest {
    pub fn new(bbox: BoundingBox, zoom: u8, output: impl Into<PathBuf>) -> Self {
        Self {
            bbox,
            zoom,
            output: output.into(),
            aerial_output: None,
            shrink_factor: 1,
            filter: ResampleFilter::default(),
        }
    }

    pub fn with_aerial_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.aerial_output = Some(path.into());
        self
    }

    pub fn with_shrink_factor(mut self, factor: u32) -> Self {
        self.shrink_factor = factor.max(1);
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Summary of a completed mosaic.
#[derive(Debug, Clone)]
pub struct MosaicReport {
    pub grid: TileGrid,
    pub fetch: FetchStats,
    /// Cropped aerial raster size, before any shrink
    pub aerial_size: (u32, u32),
    /// Size of the written output raster
    pub output_size: (u32, u32),
    pub output: PathBuf,
    pub aerial_output: Option<PathBuf>,
}
