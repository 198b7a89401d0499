//! Bounding box → tile grid planning.

use super::{BoundingBox, GridError};
use crate::coord::{lat_lon_to_pixel, pixel_to_tile, tile_to_pixel, PixelCoord, TileCoord, TILE_SIZE};
use tracing::debug;

/// Pixel rectangle to keep from the stitched canvas.
///
/// Offsets are relative to the top-left pixel of the grid's first tile.
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropWindow {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Rectangular range of tiles covering a bounding box at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    zoom: u8,
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
    crop: CropWindow,
}

impl TileGrid {
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// First (north-west) tile of the grid.
    pub fn min_tile(&self) -> TileCoord {
        TileCoord::new(self.x_min, self.y_min, self.zoom)
    }

    /// Last (south-east) tile of the grid.
    pub fn max_tile(&self) -> TileCoord {
        TileCoord::new(self.x_max, self.y_max, self.zoom)
    }

    pub fn columns(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    pub fn rows(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    pub fn tile_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Width of the uncropped canvas the grid stitches into.
    pub fn canvas_width(&self) -> u32 {
        self.columns() * TILE_SIZE
    }

    /// Height of the uncropped canvas the grid stitches into.
    pub fn canvas_height(&self) -> u32 {
        self.rows() * TILE_SIZE
    }

    pub fn crop(&self) -> CropWindow {
        self.crop
    }

    /// World pixel of the canvas' top-left corner.
    pub fn origin(&self) -> PixelCoord {
        // Planned tiles are always inside the zoom's grid
        PixelCoord {
            x: self.x_min * TILE_SIZE,
            y: self.y_min * TILE_SIZE,
            zoom: self.zoom,
        }
    }

    /// Tile at a grid-relative column and row, if inside the grid.
    pub fn tile_at(&self, column: u32, row: u32) -> Option<TileCoord> {
        if column >= self.columns() || row >= self.rows() {
            return None;
        }
        Some(TileCoord::new(
            self.x_min + column,
            self.y_min + row,
            self.zoom,
        ))
    }

    /// Grid-relative (column, row) of a tile, if it belongs to the grid.
    pub fn position_of(&self, tile: &TileCoord) -> Option<(u32, u32)> {
        if tile.zoom != self.zoom
            || !(self.x_min..=self.x_max).contains(&tile.x)
            || !(self.y_min..=self.y_max).contains(&tile.y)
        {
            return None;
        }
        Some((tile.x - self.x_min, tile.y - self.y_min))
    }

    /// Iterates over all tiles in row-major order (north row first, west to east).
    pub fn tiles(&self) -> TileGridIter {
        TileGridIter {
            grid: *self,
            current: 0,
        }
    }
}

/// Iterator over every tile in a [`TileGrid`], row-major.
#[derive(Debug, Clone)]
pub struct TileGridIter {
    grid: TileGrid,
    current: usize,
}

impl Iterator for TileGridIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.grid.tile_count() {
            return None;
        }

        let columns = self.grid.columns() as usize;
        let column = (self.current % columns) as u32;
        let row = (self.current / columns) as u32;
        self.current += 1;

        self.grid.tile_at(column, row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.tile_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileGridIter {}

/// Plans the tile grid covering `bbox` at `zoom`.
///
/// Both corners are projected to pixels, the pixel rectangle is normalized
/// with element-wise min/max (north maps to the smaller pixel row), and the
/// rectangle's corners are floored to tile indices.
///
/// # Errors
///
/// * `GridError::Coord` for an unsupported zoom
/// * `GridError::DegenerateBoundingBox` if the box rounds to zero pixels
///   wide or tall at this zoom
pub fn plan_grid(bbox: &BoundingBox, zoom: u8) -> Result<TileGrid, GridError> {
    let south_west = lat_lon_to_pixel(bbox.south(), bbox.west(), zoom)?;
    let north_east = lat_lon_to_pixel(bbox.north(), bbox.east(), zoom)?;

    let min = PixelCoord {
        x: south_west.x.min(north_east.x),
        y: south_west.y.min(north_east.y),
        zoom,
    };
    let max = PixelCoord {
        x: south_west.x.max(north_east.x),
        y: south_west.y.max(north_east.y),
        zoom,
    };

    if min.x == max.x || min.y == max.y {
        return Err(GridError::DegenerateBoundingBox(format!(
            "{} covers {}x{} pixels at zoom {}",
            bbox,
            max.x - min.x,
            max.y - min.y,
            zoom
        )));
    }

    let first = pixel_to_tile(&min);
    let last = pixel_to_tile(&max);
    let origin = tile_to_pixel(&first)?;

    let grid = TileGrid {
        zoom,
        x_min: first.x,
        x_max: last.x,
        y_min: first.y,
        y_max: last.y,
        crop: CropWindow {
            left: min.x - origin.x,
            top: min.y - origin.y,
            right: max.x - origin.x,
            bottom: max.y - origin.y,
        },
    };

    debug!(
        zoom,
        first = %first,
        last = %last,
        tiles = grid.tile_count(),
        width = grid.crop.width(),
        height = grid.crop.height(),
        "Planned tile grid"
    );

    Ok(grid)
}
